//! The record produced for each processed HTML file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured data extracted from a single HTML page.
///
/// A record is built up by exactly one processor (or a plugin extractor
/// chain) and is immutable once the pipeline collects it. `processed_time`
/// is set when extraction begins and is deliberately excluded from JSON
/// serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Source URL; for on-disk files this is a `file://` URI.
    pub url: String,

    /// Extracted page title, possibly empty.
    #[serde(default)]
    pub title: String,

    /// Concatenated visible text.
    #[serde(default)]
    pub text_content: String,

    /// Original HTML, when the processor captures it.
    #[serde(default)]
    pub html_content: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub links: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,

    /// Free-form key/value metadata (e.g. `<meta>` tags, infobox rows).
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// When extraction of this record began (UTC).
    #[serde(skip, default = "Utc::now")]
    pub processed_time: DateTime<Utc>,
}

impl Record {
    /// Creates an empty record for the given URL, stamped with the current
    /// time.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            text_content: String::new(),
            html_content: String::new(),
            keywords: Vec::new(),
            links: Vec::new(),
            images: Vec::new(),
            metadata: HashMap::new(),
            processed_time: Utc::now(),
        }
    }
}
