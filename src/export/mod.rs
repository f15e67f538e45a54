//! Record exporters
//!
//! Three sinks for a processed record set: a pretty-printed JSON array, a
//! flat CSV table, and a relational SQLite database. JSON and CSV may leave
//! a partial file behind on failure; the database export is transactional
//! and rolls back as a whole.

mod csv;
mod database;
mod json;

pub use self::csv::export_csv;
pub use self::database::{export_database, SCHEMA_SQL};
pub use self::json::export_json;

use thiserror::Error;

/// Errors raised while exporting records.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("database export failed: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("unknown export format: {0}")]
    UnknownFormat(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
