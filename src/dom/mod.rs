//! DOM walk helpers
//!
//! Small helpers over `scraper` element references shared by the built-in
//! processors and the plugin extractors. These mirror how the extractors
//! consume a parsed document: title tags read only their first text child,
//! paragraph text is the concatenation of immediate text children, and full
//! subtree text skips `script`/`style`.

use scraper::{ElementRef, Node};

/// Returns the first direct text child of an element, if any.
///
/// This is the lookup used for `<title>` extraction: nested markup inside a
/// title is ignored on purpose.
pub fn first_text_child(element: ElementRef) -> Option<String> {
    element.children().find_map(|child| match child.value() {
        Node::Text(text) => Some(text.to_string()),
        _ => None,
    })
}

/// Concatenates the direct text children of an element, appending a space
/// after each one.
///
/// Child elements are not descended into; `<p>one <b>two</b> three</p>`
/// yields `"one  three "`.
pub fn immediate_text(element: ElementRef) -> String {
    let mut out = String::new();
    for child in element.children() {
        if let Node::Text(text) = child.value() {
            out.push_str(text);
            out.push(' ');
        }
    }
    out
}

/// Recursively extracts the text content of a subtree, skipping `script`
/// and `style` elements and separating sibling fragments with spaces.
pub fn recursive_text(element: ElementRef) -> String {
    let mut parts: Vec<String> = Vec::new();
    collect_text(element, &mut parts);
    parts.join(" ")
}

fn collect_text(element: ElementRef, parts: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            Node::Element(el) => {
                let name = el.name();
                if name == "script" || name == "style" {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, parts);
                }
            }
            _ => {}
        }
    }
}

/// Looks up an attribute value on an element.
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// Returns true when the element is one of `h1`..`h6`.
pub fn is_heading(element: ElementRef) -> bool {
    matches!(
        element.value().name(),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn select_first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let selector = Selector::parse(css).unwrap();
        doc.select(&selector).next().unwrap()
    }

    #[test]
    fn test_first_text_child() {
        let doc = Html::parse_document("<title>Hello</title>");
        let title = select_first(&doc, "title");
        assert_eq!(first_text_child(title), Some("Hello".to_string()));
    }

    #[test]
    fn test_first_text_child_empty_element() {
        let doc = Html::parse_document("<title></title>");
        let title = select_first(&doc, "title");
        assert_eq!(first_text_child(title), None);
    }

    #[test]
    fn test_immediate_text_skips_nested_elements() {
        let doc = Html::parse_document("<p>one <b>two</b> three</p>");
        let p = select_first(&doc, "p");
        let text = immediate_text(p);
        assert!(text.contains("one"));
        assert!(text.contains("three"));
        assert!(!text.contains("two"));
    }

    #[test]
    fn test_recursive_text_descends() {
        let doc = Html::parse_document("<div>one <b>two</b> three</div>");
        let div = select_first(&doc, "div");
        assert_eq!(recursive_text(div), "one two three");
    }

    #[test]
    fn test_recursive_text_skips_script_and_style() {
        let doc = Html::parse_document(
            "<div>keep<script>var x = 1;</script><style>p{}</style></div>",
        );
        let div = select_first(&doc, "div");
        assert_eq!(recursive_text(div), "keep");
    }

    #[test]
    fn test_attr_lookup() {
        let doc = Html::parse_document(r#"<a href="/x" rel="nofollow">link</a>"#);
        let a = select_first(&doc, "a");
        assert_eq!(attr(a, "href"), Some("/x"));
        assert_eq!(attr(a, "download"), None);
    }

    #[test]
    fn test_is_heading() {
        let doc = Html::parse_document("<h2>t</h2><p>x</p>");
        assert!(is_heading(select_first(&doc, "h2")));
        assert!(!is_heading(select_first(&doc, "p")));
    }
}
