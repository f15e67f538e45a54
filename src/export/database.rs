//! Relational (SQLite) exporter.

use crate::export::ExportResult;
use crate::record::Record;
use rusqlite::{params, Connection};
use std::path::Path;

/// Schema for the exported database: one `pages` row per record plus child
/// tables for the vector and map fields.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT UNIQUE NOT NULL,
    title TEXT,
    text_content TEXT,
    html_content TEXT,
    processed_time TEXT
);

CREATE TABLE IF NOT EXISTS keywords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL,
    keyword TEXT NOT NULL,
    FOREIGN KEY (page_id) REFERENCES pages (id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL,
    link TEXT NOT NULL,
    FOREIGN KEY (page_id) REFERENCES pages (id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL,
    image_url TEXT NOT NULL,
    FOREIGN KEY (page_id) REFERENCES pages (id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS metadata (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    FOREIGN KEY (page_id) REFERENCES pages (id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_pages_url ON pages(url);
CREATE INDEX IF NOT EXISTS idx_keywords_page_id ON keywords(page_id);
CREATE INDEX IF NOT EXISTS idx_links_page_id ON links(page_id);
CREATE INDEX IF NOT EXISTS idx_images_page_id ON images(page_id);
CREATE INDEX IF NOT EXISTS idx_metadata_page_id ON metadata(page_id);
CREATE INDEX IF NOT EXISTS idx_keywords_keyword ON keywords(keyword);
CREATE INDEX IF NOT EXISTS idx_links_link ON links(link);
"#;

/// Writes the records into a SQLite database at `path`.
///
/// The whole export runs in one transaction: any failure rolls everything
/// back and the call errors. Pages are upserted by URL; the `ON DELETE
/// CASCADE` foreign keys clear a replaced page's old child rows.
pub fn export_database(records: &[Record], path: &Path) -> ExportResult<()> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;

    {
        let mut insert_page = tx.prepare(
            "INSERT OR REPLACE INTO pages (url, title, text_content, html_content, processed_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        let mut insert_keyword =
            tx.prepare("INSERT INTO keywords (page_id, keyword) VALUES (?1, ?2)")?;
        let mut insert_link = tx.prepare("INSERT INTO links (page_id, link) VALUES (?1, ?2)")?;
        let mut insert_image =
            tx.prepare("INSERT INTO images (page_id, image_url) VALUES (?1, ?2)")?;
        let mut insert_metadata =
            tx.prepare("INSERT INTO metadata (page_id, key, value) VALUES (?1, ?2, ?3)")?;

        for record in records {
            let time = record
                .processed_time
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string();

            insert_page.execute(params![
                record.url,
                record.title,
                record.text_content,
                record.html_content,
                time,
            ])?;
            let page_id = tx.last_insert_rowid();

            for keyword in &record.keywords {
                insert_keyword.execute(params![page_id, keyword])?;
            }
            for link in &record.links {
                insert_link.execute(params![page_id, link])?;
            }
            for image in &record.images {
                insert_image.execute(params![page_id, image])?;
            }
            for (key, value) in &record.metadata {
                insert_metadata.execute(params![page_id, key, value])?;
            }
        }
    }

    tx.commit()?;
    tracing::info!(
        "exported {} records to database {}",
        records.len(),
        path.display()
    );
    Ok(())
}
