//! Wikipedia article processor
//!
//! Extracts the pieces of a Wikipedia article page that the generic
//! processor mangles: the real article title, the lead content up to the
//! terminal sections, category names, in-content article links, thumbnail
//! images, and infobox rows.

use crate::dom::{is_heading, recursive_text};
use crate::plugins::{ChainProcessor, PluginInfo};
use crate::processors::{ProcessorOptions, ProcessorRegistry};
use crate::record::Record;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;

const INFO: PluginInfo = PluginInfo {
    name: "Wikipedia article processor",
    version: "1.2.0",
    description: "Extracts title, lead content, categories, article links, \
                  images, and infobox data from Wikipedia pages",
};

/// Link prefix for article hrefs; override with the `base-url` option.
const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";

/// Section headings that mark the end of the article's main content.
const STOP_HEADINGS: &[&str] = &[
    "see also",
    "references",
    "external links",
    "further reading",
    "bibliography",
    "notes",
    "sources",
    "gallery",
    "awards",
    "filmography",
    "discography",
    "works",
    "publications",
];

/// Registers the `wikipedia` processor.
pub fn register(registry: &mut ProcessorRegistry) {
    tracing::debug!("registering plugin: {} v{}", INFO.name, INFO.version);

    let mut processor = ChainProcessor::new("wikipedia", INFO);
    processor.add_extractor(extract_title);
    processor.add_extractor(extract_content);
    processor.add_extractor(extract_categories);
    processor.add_extractor(extract_article_links);
    processor.add_extractor(extract_images);
    processor.add_extractor(extract_infobox);
    registry.register(Box::new(processor));
}

fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

/// Article title lives in `<h1 id="firstHeading">`, not `<title>`.
fn extract_title(document: &Html, record: &mut Record, _options: &ProcessorOptions) {
    if let Some(heading) = select_first(document, "#firstHeading") {
        record.title = recursive_text(heading).trim().to_string();
    }
}

/// Collects paragraph, list, and table-cell text from the content body,
/// stopping at the first terminal section heading.
fn extract_content(document: &Html, record: &mut Record, _options: &ProcessorOptions) {
    let Some(content) = select_first(document, "#mw-content-text") else {
        return;
    };

    let mut text = String::new();
    walk_content(content, &mut text);
    record.text_content = text;
}

/// Returns true once a stop heading has been reached.
fn walk_content(element: ElementRef, out: &mut String) -> bool {
    for child in element.children() {
        let Some(child_ref) = ElementRef::wrap(child) else {
            continue;
        };

        if is_heading(child_ref) {
            let heading = recursive_text(child_ref).trim().to_lowercase();
            if STOP_HEADINGS.contains(&heading.as_str()) {
                return true;
            }
            continue;
        }

        match child_ref.value().name() {
            "p" | "li" | "td" => {
                let text = recursive_text(child_ref);
                let text = text.trim();
                if !text.is_empty() {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(text);
                }
            }
            "script" | "style" => {}
            _ => {
                if walk_content(child_ref, out) {
                    return true;
                }
            }
        }
    }
    false
}

/// Category links become keywords, deduplicated and sorted.
fn extract_categories(document: &Html, record: &mut Record, _options: &ProcessorOptions) {
    let Ok(selector) = Selector::parse(r#"a[href*="/wiki/Category:"]"#) else {
        return;
    };

    let mut categories = BTreeSet::new();
    for element in document.select(&selector) {
        let Some(title) = element.value().attr("title") else {
            continue;
        };
        if let Some(category) = title.strip_prefix("Category:") {
            let category = category.trim();
            if !category.is_empty() {
                categories.insert(category.to_string());
            }
        }
    }

    record.keywords = categories.into_iter().collect();
}

/// Relative `/wiki/...` hrefs in the content body become absolute article
/// links. Hrefs containing `:` are namespace pages (File:, Category:, ...)
/// and are skipped.
fn extract_article_links(document: &Html, record: &mut Record, options: &ProcessorOptions) {
    let Some(content) = select_first(document, "#mw-content-text") else {
        return;
    };
    let Ok(selector) = Selector::parse("a[href]") else {
        return;
    };

    let base_url = options
        .get("base-url")
        .map(String::as_str)
        .unwrap_or(DEFAULT_BASE_URL);

    let mut links = BTreeSet::new();
    for element in content.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.starts_with("http") && href.contains("/wiki/") && !href.contains(':') {
            links.insert(format!("{}{}", base_url, href));
        }
    }

    record.links = links.into_iter().collect();
}

/// Thumbnail images from the content body, with protocol-relative sources
/// fixed up.
fn extract_images(document: &Html, record: &mut Record, _options: &ProcessorOptions) {
    let Some(content) = select_first(document, "#mw-content-text") else {
        return;
    };
    let Ok(selector) = Selector::parse("img.thumbimage[src]") else {
        return;
    };

    let mut images = BTreeSet::new();
    for element in content.select(&selector) {
        if let Some(src) = element.value().attr("src") {
            let src = if let Some(rest) = src.strip_prefix("//") {
                format!("https://{}", rest)
            } else {
                src.to_string()
            };
            images.insert(src);
        }
    }

    record.images = images.into_iter().collect();
}

/// Infobox rows (`th`/`td` pairs) become `infobox_<header>` metadata.
fn extract_infobox(document: &Html, record: &mut Record, _options: &ProcessorOptions) {
    let Some(infobox) = select_first(document, ".infobox") else {
        return;
    };
    let Ok(rows) = Selector::parse("tr") else {
        return;
    };

    for row in infobox.select(&rows) {
        let mut header = None;
        let mut data = None;
        for cell in row.children().filter_map(ElementRef::wrap) {
            match cell.value().name() {
                "th" => header = Some(cell),
                "td" => data = Some(cell),
                _ => {}
            }
        }

        if let (Some(header), Some(data)) = (header, data) {
            let key = recursive_text(header).trim().to_string();
            let value = recursive_text(data).trim().to_string();
            if !key.is_empty() && !value.is_empty() {
                record.metadata.insert(format!("infobox_{}", key), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::Processor;

    const ARTICLE: &str = r#"<html><head><title>Ada Lovelace - Wikipedia</title></head>
    <body>
        <h1 id="firstHeading">Ada <i>Lovelace</i></h1>
        <div id="mw-content-text">
            <table class="infobox">
                <tr><th>Born</th><td>1815</td></tr>
                <tr><th>Died</th><td>1852</td></tr>
                <tr><td colspan="2">portrait</td></tr>
            </table>
            <p>Ada Lovelace was an <a href="/wiki/Mathematician" title="Mathematician">English mathematician</a>.</p>
            <img class="thumbimage" src="//upload.example.org/ada.jpg">
            <ul><li>First bullet</li></ul>
            <h2>See also</h2>
            <p>Not part of the lead.</p>
        </div>
        <div id="catlinks">
            <a href="/wiki/Category:1815_births" title="Category:1815 births">1815 births</a>
            <a href="/wiki/Category:Mathematicians" title="Category:Mathematicians">Mathematicians</a>
        </div>
    </body></html>"#;

    fn record_for(html: &str) -> Record {
        let mut registry = ProcessorRegistry::new();
        register(&mut registry);
        registry.get("wikipedia").unwrap().process("u", html)
    }

    #[test]
    fn test_title_from_first_heading() {
        let record = record_for(ARTICLE);
        assert_eq!(record.title, "Ada Lovelace");
    }

    #[test]
    fn test_content_stops_at_terminal_heading() {
        let record = record_for(ARTICLE);
        assert!(record.text_content.contains("English mathematician"));
        assert!(record.text_content.contains("First bullet"));
        assert!(!record.text_content.contains("Not part of the lead"));
    }

    #[test]
    fn test_categories_become_keywords() {
        let record = record_for(ARTICLE);
        assert_eq!(record.keywords, vec!["1815 births", "Mathematicians"]);
    }

    #[test]
    fn test_article_links_absolute_and_deduped() {
        let record = record_for(ARTICLE);
        assert_eq!(
            record.links,
            vec!["https://en.wikipedia.org/wiki/Mathematician"]
        );
    }

    #[test]
    fn test_base_url_override() {
        let mut chain = ChainProcessor::new("wikipedia", INFO);
        chain.add_extractor(extract_article_links);
        let mut options = ProcessorOptions::new();
        options.insert(
            "base-url".to_string(),
            "https://de.wikipedia.org".to_string(),
        );
        chain.configure(&options);

        let record = chain.process("u", ARTICLE);
        assert_eq!(
            record.links,
            vec!["https://de.wikipedia.org/wiki/Mathematician"]
        );
    }

    #[test]
    fn test_thumbnail_images_protocol_fixed() {
        let record = record_for(ARTICLE);
        assert_eq!(record.images, vec!["https://upload.example.org/ada.jpg"]);
    }

    #[test]
    fn test_infobox_rows_in_metadata() {
        let record = record_for(ARTICLE);
        assert_eq!(
            record.metadata.get("infobox_Born").map(String::as_str),
            Some("1815")
        );
        assert_eq!(
            record.metadata.get("infobox_Died").map(String::as_str),
            Some("1852")
        );
        // Rows without a header cell are skipped.
        assert_eq!(record.metadata.len(), 2);
    }
}
