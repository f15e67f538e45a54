//! The general-purpose extractor: title, block text, links, and images.

use crate::dom::{attr, first_text_child, immediate_text};
use crate::processors::Processor;
use crate::record::Record;
use scraper::{Html, Selector};

/// Extracts title, paragraph/heading text, anchor hrefs, and image sources.
///
/// Href and src values are stored as written in the document; relative URLs
/// are not resolved here.
pub struct GenericProcessor;

impl Processor for GenericProcessor {
    fn name(&self) -> &str {
        "generic"
    }

    fn process(&self, url: &str, html: &str) -> Record {
        let mut record = Record::new(url);
        record.html_content = html.to_string();

        let document = Html::parse_document(html);

        if let Ok(selector) = Selector::parse("title") {
            if let Some(element) = document.select(&selector).next() {
                if let Some(title) = first_text_child(element) {
                    record.title = title;
                }
            }
        }

        // Visible text comes from paragraphs and headings only.
        if let Ok(selector) = Selector::parse("p, h1, h2, h3, h4, h5, h6") {
            for element in document.select(&selector) {
                record.text_content.push_str(&immediate_text(element));
            }
        }

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

/// Text-focused extraction; currently delegates to [`GenericProcessor`].
pub struct TextProcessor;

impl Processor for TextProcessor {
    fn name(&self) -> &str {
        "text"
    }

    fn process(&self, url: &str, html: &str) -> Record {
        GenericProcessor.process(url, html)
    }
}
