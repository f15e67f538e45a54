//! CSV exporter.

use crate::export::{ExportError, ExportResult};
use crate::record::Record;
use ::csv::{QuoteStyle, WriterBuilder};
use std::fs::File;
use std::path::Path;

/// Content columns are capped at this many characters.
const MAX_FIELD_CHARS: usize = 1000;

/// Writes the records as a CSV table with every field quoted.
///
/// `text_content` and `html_content` are truncated to 1000 characters. The
/// vector columns (keywords, links, images) are emitted as empty strings;
/// consumers needing them should use the JSON or database exporters.
pub fn export_csv(records: &[Record], path: &Path) -> ExportResult<()> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(file);

    writer.write_record([
        "URL",
        "Title",
        "Text Content",
        "HTML Content",
        "Keywords",
        "Links",
        "Images",
    ])?;

    for record in records {
        let text = truncate(&record.text_content);
        let html = truncate(&record.html_content);
        writer.write_record([
            record.url.as_str(),
            record.title.as_str(),
            text.as_str(),
            html.as_str(),
            "",
            "",
            "",
        ])?;
    }

    writer.flush().map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!("exported {} records to {}", records.len(), path.display());
    Ok(())
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_FIELD_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut record = Record::new("http://example.com/a");
        record.title = r#"He said "hi""#.to_string();
        export_csv(&[record], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            r#""URL","Title","Text Content","HTML Content","Keywords","Links","Images""#
        );
        // Inner quotes are doubled.
        assert!(lines.next().unwrap().contains(r#""He said ""hi""""#));
    }

    #[test]
    fn test_content_truncated_to_1000_chars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut record = Record::new("u");
        record.text_content = "x".repeat(2500);
        export_csv(&[record], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let data_line = content.lines().nth(1).unwrap();
        let longest_run = data_line
            .split('"')
            .map(|part| part.len())
            .max()
            .unwrap_or(0);
        assert_eq!(longest_run, MAX_FIELD_CHARS);
    }

    #[test]
    fn test_vector_fields_emitted_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut record = Record::new("u");
        record.links.push("http://example.com/b".to_string());
        export_csv(&[record], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("example.com/b"));
        assert!(content.lines().nth(1).unwrap().ends_with(r#""","","""#));
    }
}
