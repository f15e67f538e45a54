//! Metadata extractor for `<meta>` tags.

use crate::dom::{attr, first_text_child};
use crate::processors::Processor;
use crate::record::Record;
use scraper::{Html, Selector};

/// Collects `<meta name=... content=...>` and OpenGraph-style
/// `<meta property=... content=...>` pairs, plus the page title.
///
/// When a tag carries both `name` and `property`, the `property` entry is
/// written last and wins.
pub struct MetadataProcessor;

impl Processor for MetadataProcessor {
    fn name(&self) -> &str {
        "metadata"
    }

    fn process(&self, url: &str, html: &str) -> Record {
        let mut record = Record::new(url);
        let document = Html::parse_document(html);

        if let Ok(selector) = Selector::parse("meta") {
            for element in document.select(&selector) {
                let Some(content) = attr(element, "content") else {
                    continue;
                };

                if let Some(name) = attr(element, "name") {
                    record
                        .metadata
                        .insert(name.to_string(), content.to_string());
                }

                if let Some(property) = attr(element, "property") {
                    record
                        .metadata
                        .insert(property.to_string(), content.to_string());
                }
            }
        }

        if let Ok(selector) = Selector::parse("title") {
            if let Some(element) = document.select(&selector).next() {
                if let Some(title) = first_text_child(element) {
                    record.title = title;
                }
            }
        }

        record
    }
}
