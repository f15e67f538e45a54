//! Link-only extractor.

use crate::dom::attr;
use crate::processors::Processor;
use crate::record::Record;
use scraper::{Html, Selector};

/// Collects anchor hrefs and image sources and nothing else.
pub struct LinkProcessor;

impl Processor for LinkProcessor {
    fn name(&self) -> &str {
        "links"
    }

    fn process(&self, url: &str, html: &str) -> Record {
        let mut record = Record::new(url);
        let document = Html::parse_document(html);

        if let Ok(selector) = Selector::parse("a[href]") {
            for element in document.select(&selector) {
                if let Some(href) = attr(element, "href") {
                    record.links.push(href.to_string());
                }
            }
        }

        if let Ok(selector) = Selector::parse("img[src]") {
            for element in document.select(&selector) {
                if let Some(src) = attr(element, "src") {
                    record.images.push(src.to_string());
                }
            }
        }

        record
    }
}
