//! URL string utilities
//!
//! The crawler works on URL strings directly: it extracts the origin prefix
//! used for same-host scoping, resolves hrefs against that origin, and
//! derives filesystem-safe names for persisted pages. Resolution is literal
//! concatenation; there is no dot-segment normalization and no query or
//! fragment handling.

/// Extracts the origin (`scheme://host[:port]`) from an absolute URL.
///
/// Returns `None` when the input does not start with an HTTP(S) scheme or
/// has no host part.
///
/// # Examples
///
/// ```
/// use webminer::url::extract_origin;
///
/// assert_eq!(
///     extract_origin("https://example.com/a/b?q=1"),
///     Some("https://example.com".to_string())
/// );
/// ```
pub fn extract_origin(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("http://")
        .map(|r| ("http://", r))
        .or_else(|| url.strip_prefix("https://").map(|r| ("https://", r)))?;

    let (scheme, after) = rest;
    let host_end = after.find('/').unwrap_or(after.len());
    let host = &after[..host_end];
    if host.is_empty() {
        return None;
    }

    Some(format!("{}{}", scheme, host))
}

/// Resolves an href against a base origin.
///
/// Rules, applied in order:
/// - `http://` / `https://` prefixed hrefs are returned unchanged
/// - `//host/...` gets the base's scheme prepended
/// - `/path` is appended to the base
/// - anything else is appended after a `/` separator
///
/// Empty hrefs and fragment-only hrefs are the caller's problem; this
/// function assumes they were filtered out already.
pub fn resolve(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    // Protocol-relative: keep the base's scheme
    if let Some(rest) = href.strip_prefix("//") {
        if let Some(colon) = base.find(':') {
            return format!("{}://{}", &base[..colon], rest);
        }
    }

    if href.starts_with('/') {
        return format!("{}{}", base, href);
    }

    if base.ends_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}

/// Derives a filesystem-safe filename stem from a URL.
///
/// Every run of `:` and `/` characters collapses to a single `_`, so
/// `https://example.com/a` becomes `https_example.com_a`. The `.html`
/// extension is appended by the caller.
pub fn safe_filename(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut in_run = false;

    for ch in url.chars() {
        if ch == ':' || ch == '/' {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }

    out
}
