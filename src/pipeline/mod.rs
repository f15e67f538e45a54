//! Processing pipeline
//!
//! Enumerates the `.html` files of an input directory, runs the selected
//! processor over each one on a worker pool (or inline when configured with
//! zero threads), collects the records, optionally filters them with a
//! query, and hands the result set to an exporter.

use crate::export;
use crate::plugins;
use crate::pool::ThreadPool;
use crate::processors::{ProcessorOptions, ProcessorRegistry};
use crate::query::Query;
use crate::record::Record;
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default processor when none has been selected.
const DEFAULT_PROCESSOR: &str = "generic";

/// Drives extraction over a directory of HTML files.
pub struct Pipeline {
    input_dir: PathBuf,
    registry: Arc<ProcessorRegistry>,
    chain: Vec<String>,
    threads: usize,
}

impl Pipeline {
    /// Creates a pipeline over `input_dir`.
    ///
    /// Registers the built-in processors, then every plugin.
    ///
    /// # Arguments
    ///
    /// * `input_dir` - Directory whose `.html` files will be processed
    /// * `threads` - Worker pool size; zero processes files synchronously
    ///   on the calling thread
    ///
    /// # Example
    ///
    /// ```
    /// use webminer::Pipeline;
    ///
    /// let mut pipeline = Pipeline::new("output", 4);
    /// pipeline.add_processor("metadata");
    /// ```
    pub fn new(input_dir: impl Into<PathBuf>, threads: usize) -> Self {
        let mut registry = ProcessorRegistry::with_builtins();
        plugins::register_all(&mut registry);

        if threads == 0 {
            tracing::info!("processing will run synchronously");
        } else {
            tracing::info!("processing with {} worker threads", threads);
        }

        Self {
            input_dir: input_dir.into(),
            registry: Arc::new(registry),
            chain: Vec::new(),
            threads,
        }
    }

    /// Appends a processor name to the chain.
    ///
    /// The chain is currently a selection list: only its first entry is
    /// consumed per file.
    pub fn add_processor(&mut self, name: impl Into<String>) {
        self.chain.push(name.into());
    }

    /// Registered processor names.
    pub fn processor_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Forwards options to a named processor.
    ///
    /// Only valid before the first processing call; returns false when the
    /// processor is unknown or the registry is already shared.
    pub fn configure_processor(&mut self, name: &str, options: &ProcessorOptions) -> bool {
        match Arc::get_mut(&mut self.registry) {
            Some(registry) => registry.configure(name, options),
            None => false,
        }
    }

    /// Processes every `.html` file in the input directory.
    ///
    /// Results arrive in submission order; files that fail to read or
    /// process are logged and skipped. Result order is not a contract.
    pub fn process_all(&self) -> Vec<Record> {
        let files = self.html_files();
        if files.is_empty() {
            tracing::warn!("no .html files found in {}", self.input_dir.display());
            return Vec::new();
        }

        tracing::info!("processing {} files", files.len());
        let processor = self.selected_processor();

        if self.threads == 0 {
            return files
                .iter()
                .filter_map(|path| process_file(&self.registry, &processor, path))
                .collect();
        }

        let pool = ThreadPool::new(self.threads);
        let handles: Vec<_> = files
            .into_iter()
            .map(|path| {
                let registry = Arc::clone(&self.registry);
                let processor = processor.clone();
                pool.submit(move || process_file(&registry, &processor, &path))
            })
            .collect();

        let mut records = Vec::new();
        for handle in handles {
            match handle {
                Ok(handle) => match handle.wait() {
                    Ok(Some(record)) => records.push(record),
                    Ok(None) => {}
                    Err(error) => tracing::error!("processing task failed: {}", error),
                },
                Err(error) => tracing::error!("failed to submit processing task: {}", error),
            }
        }
        records
    }

    /// Processes every file, keeping only the records matching `query`.
    pub fn process_filtered(&self, query: &Query) -> Vec<Record> {
        let records = self.process_all();
        let total = records.len();
        let matched: Vec<Record> = records
            .into_iter()
            .filter(|record| query.matches(record))
            .collect();

        tracing::info!("query matched {} of {} records", matched.len(), total);
        matched
    }

    /// Exports records as a JSON array.
    pub fn export_json(&self, records: &[Record], path: &Path) -> Result<()> {
        export::export_json(records, path)?;
        Ok(())
    }

    /// Exports records as CSV.
    pub fn export_csv(&self, records: &[Record], path: &Path) -> Result<()> {
        export::export_csv(records, path)?;
        Ok(())
    }

    /// Exports records into a SQLite database.
    pub fn export_database(&self, records: &[Record], path: &Path) -> Result<()> {
        export::export_database(records, path)?;
        Ok(())
    }

    fn selected_processor(&self) -> String {
        self.chain
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_PROCESSOR.to_string())
    }

    /// Non-recursive listing of the input directory's `.html` files.
    fn html_files(&self) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(&self.input_dir) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::error!(
                    "cannot read input directory {}: {}",
                    self.input_dir.display(),
                    error
                );
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext == "html")
            })
            .collect();

        files.sort();
        files
    }
}

/// Reads and processes one file; `None` means the file was skipped.
fn process_file(
    registry: &ProcessorRegistry,
    processor_name: &str,
    path: &Path,
) -> Option<Record> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("failed to read {}: {}", path.display(), error);
            return None;
        }
    };
    let html = String::from_utf8_lossy(&bytes);

    let Some(processor) = registry.get(processor_name) else {
        tracing::error!("processor not found: {}", processor_name);
        return None;
    };

    let absolute = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    let url = format!("file://{}", absolute.display());

    Some(processor.process(&url, &html))
}
