//! Link extraction for the crawl loop.

use crate::url::resolve;
use scraper::{Html, Selector};

/// Walks a page's anchors and returns the absolute same-origin URLs worth
/// following.
///
/// Empty and fragment-only hrefs are skipped, everything else is resolved
/// against the origin, and only HTTP(S) URLs starting with the origin
/// survive. Deduplication against the visited set happens later, under the
/// frontier lock.
pub fn same_origin_links(html: &str, origin: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let href = href.trim();
            if href.is_empty() || href.starts_with('#') || has_non_http_scheme(href) {
                continue;
            }

            let absolute = resolve(origin, href);
            if !absolute.starts_with("http://") && !absolute.starts_with("https://") {
                continue;
            }

            if absolute.starts_with(origin) {
                links.push(absolute);
            }
        }
    }

    links
}

/// Detects hrefs carrying an explicit scheme other than HTTP(S)
/// (`mailto:`, `javascript:`, `ftp://`, ...). A `:` later in a path does
/// not count as a scheme.
fn has_non_http_scheme(href: &str) -> bool {
    let Some(colon) = href.find(':') else {
        return false;
    };

    let scheme = &href[..colon];
    if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
        return false;
    }

    scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
}
