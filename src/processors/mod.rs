//! Processor interface and registry
//!
//! A processor is a named extractor turning `(url, html)` into a [`Record`].
//! Processors are registered once at pipeline construction and then shared
//! read-only across all worker threads, so `process` must be safe to call
//! concurrently on distinct inputs.

mod generic;
mod links;
mod metadata;

pub use generic::{GenericProcessor, TextProcessor};
pub use links::LinkProcessor;
pub use metadata::MetadataProcessor;

use crate::record::Record;
use std::collections::HashMap;

/// Processor-defined configuration keys and values.
pub type ProcessorOptions = HashMap<String, String>;

/// A named content extractor.
pub trait Processor: Send + Sync {
    /// The registry name of this processor.
    fn name(&self) -> &str;

    /// Extracts a record from one HTML document.
    fn process(&self, url: &str, html: &str) -> Record;

    /// Applies processor-defined options. The default ignores them.
    fn configure(&mut self, _options: &ProcessorOptions) {}
}

/// Owns every registered processor, keyed by name.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: HashMap<String, Box<dyn Processor>>,
}

impl ProcessorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in processors
    /// (`generic`, `text`, `metadata`, `links`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GenericProcessor));
        registry.register(Box::new(TextProcessor));
        registry.register(Box::new(MetadataProcessor));
        registry.register(Box::new(LinkProcessor));
        registry
    }

    /// Registers a processor under its own name, replacing any previous
    /// entry with that name.
    pub fn register(&mut self, processor: Box<dyn Processor>) {
        self.processors
            .insert(processor.name().to_string(), processor);
    }

    /// Looks up a processor by name.
    pub fn get(&self, name: &str) -> Option<&dyn Processor> {
        self.processors.get(name).map(|p| p.as_ref())
    }

    /// Registered processor names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.processors.keys().cloned().collect();
        names.sort();
        names
    }

    /// Forwards options to a named processor. Returns false when the name
    /// is unknown.
    pub fn configure(&mut self, name: &str, options: &ProcessorOptions) -> bool {
        match self.processors.get_mut(name) {
            Some(processor) => {
                processor.configure(options);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeProcessor {
        name: &'static str,
        marker: String,
    }

    impl Processor for FakeProcessor {
        fn name(&self) -> &str {
            self.name
        }

        fn process(&self, url: &str, _html: &str) -> Record {
            let mut record = Record::new(url);
            record.title = self.marker.clone();
            record
        }

        fn configure(&mut self, options: &ProcessorOptions) {
            if let Some(marker) = options.get("marker") {
                self.marker = marker.clone();
            }
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = ProcessorRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["generic", "links", "metadata", "text"]);
        assert!(registry.get("generic").is_some());
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = ProcessorRegistry::new();
        registry.register(Box::new(FakeProcessor {
            name: "fake",
            marker: "first".to_string(),
        }));
        registry.register(Box::new(FakeProcessor {
            name: "fake",
            marker: "second".to_string(),
        }));

        let record = registry.get("fake").unwrap().process("u", "");
        assert_eq!(record.title, "second");
        assert_eq!(registry.names().len(), 1);
    }

    #[test]
    fn test_configure_reaches_processor() {
        let mut registry = ProcessorRegistry::new();
        registry.register(Box::new(FakeProcessor {
            name: "fake",
            marker: "default".to_string(),
        }));

        let mut options = ProcessorOptions::new();
        options.insert("marker".to_string(), "tuned".to_string());
        assert!(registry.configure("fake", &options));
        assert!(!registry.configure("missing", &options));

        let record = registry.get("fake").unwrap().process("u", "");
        assert_eq!(record.title, "tuned");
    }
}
