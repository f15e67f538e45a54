//! webminer: a two-stage web data-mining tool
//!
//! This crate implements a concurrent same-host crawler that persists fetched
//! HTML pages to disk, and a parallel processing pipeline that runs a
//! configurable chain of extractors over those pages, filters the resulting
//! records with a composable query tree, and exports them as JSON, CSV, or a
//! relational database.

pub mod crawler;
pub mod dom;
pub mod export;
pub mod pipeline;
pub mod plugins;
pub mod pool;
pub mod processors;
pub mod query;
pub mod record;
pub mod url;

use thiserror::Error;

/// Main error type for webminer operations
#[derive(Debug, Error)]
pub enum MinerError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to create output directory {dir}: {source}")]
    OutputDir {
        dir: String,
        source: std::io::Error,
    },

    #[error("Thread pool error: {0}")]
    Pool(#[from] pool::PoolError),

    #[error("Query error: {0}")]
    Query(#[from] query::QueryError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for webminer operations
pub type Result<T> = std::result::Result<T, MinerError>;

// Re-export commonly used types
pub use crawler::{CrawlOptions, CrawlStats, Crawler};
pub use pipeline::Pipeline;
pub use processors::{Processor, ProcessorOptions, ProcessorRegistry};
pub use query::Query;
pub use record::Record;
