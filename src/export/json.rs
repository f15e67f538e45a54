//! JSON exporter.

use crate::export::{ExportError, ExportResult};
use crate::record::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the records as one pretty-printed JSON array (2-space indent).
///
/// `processed_time` is omitted from the output by contract.
pub fn export_json(records: &[Record], path: &Path) -> ExportResult<()> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush().map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!("exported {} records to {}", records.len(), path.display());
    Ok(())
}
