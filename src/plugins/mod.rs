//! Processor plugins
//!
//! The pipeline's extractor set is extensible without touching its call
//! sites: every plugin ships a registration function, and the pipeline runs
//! [`register_all`] over the static [`PLUGINS`] list at construction time.
//! Adding a plugin means adding one module and one entry to that list.
//!
//! A plugin is usually a [`ChainProcessor`]: a named processor built from an
//! ordered list of extractor functions. The chain parses the document once
//! and every extractor refines the same record.

pub mod wikipedia;

use crate::processors::{Processor, ProcessorOptions, ProcessorRegistry};
use crate::record::Record;
use scraper::Html;

/// Descriptive metadata a plugin publishes about itself.
#[derive(Debug, Clone, Copy)]
pub struct PluginInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

/// One extraction step: reads the parsed document, refines the record.
pub type Extractor = fn(&Html, &mut Record, &ProcessorOptions);

/// A processor assembled from an ordered chain of extractor functions
/// sharing a single parse per document.
pub struct ChainProcessor {
    name: &'static str,
    info: PluginInfo,
    extractors: Vec<Extractor>,
    options: ProcessorOptions,
}

impl ChainProcessor {
    pub fn new(name: &'static str, info: PluginInfo) -> Self {
        Self {
            name,
            info,
            extractors: Vec::new(),
            options: ProcessorOptions::new(),
        }
    }

    /// Appends an extractor; extractors run in insertion order.
    pub fn add_extractor(&mut self, extractor: Extractor) {
        self.extractors.push(extractor);
    }

    pub fn info(&self) -> &PluginInfo {
        &self.info
    }
}

impl Processor for ChainProcessor {
    fn name(&self) -> &str {
        self.name
    }

    fn process(&self, url: &str, html: &str) -> Record {
        let mut record = Record::new(url);
        record.html_content = html.to_string();

        let document = Html::parse_document(html);
        for extractor in &self.extractors {
            extractor(&document, &mut record, &self.options);
        }

        record
    }

    fn configure(&mut self, options: &ProcessorOptions) {
        for (key, value) in options {
            self.options.insert(key.clone(), value.clone());
        }
    }
}

/// A plugin's registration entry point.
pub type RegisterFn = fn(&mut ProcessorRegistry);

/// Every known plugin, registered in order.
pub const PLUGINS: &[RegisterFn] = &[wikipedia::register];

/// Registers all plugins into the given registry.
pub fn register_all(registry: &mut ProcessorRegistry) {
    for register in PLUGINS {
        register(registry);
    }
}
