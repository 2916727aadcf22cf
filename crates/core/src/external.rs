//! Sends absolute http(s) links to a separate browsing context.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Document, Query};

/// Browsing context used when the caller names none.
pub const DEFAULT_TARGET: &str = "new";

static EXTERNAL_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://").expect("Invalid EXTERNAL_HREF_RE regex"));

/// Whether the href is an absolute `http://` or `https://` URL.
pub fn is_external_href(href: &str) -> bool {
    EXTERNAL_HREF_RE.is_match(href)
}

/// Resolves the context name, falling back to [`DEFAULT_TARGET`] when empty.
pub fn target_or_default(context: Option<&str>) -> &str {
    match context {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_TARGET,
    }
}

/// Sets `target` on every external link. Returns how many links were updated.
pub fn apply_external_target<D: Document>(doc: &mut D, context: Option<&str>) -> usize {
    let target = target_or_default(context);
    let mut updated = 0;
    for link in doc.query_all(&Query::element("a")) {
        let Some(href) = doc.attribute(&link, "href") else {
            continue;
        };
        if href.is_empty() || !is_external_href(&href) {
            continue;
        }
        doc.set_attribute(&link, "target", target);
        updated += 1;
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDocument, MemoryElement};

    #[test]
    fn external_pattern() {
        assert!(is_external_href("https://example.com"));
        assert!(is_external_href("http://humlib.humdrum.org/doc"));
        assert!(!is_external_href("/local/path"));
        assert!(!is_external_href("mailto:someone@example.com"));
        assert!(!is_external_href("ftp://example.com"));
        assert!(!is_external_href(" https://example.com"));
        assert!(!is_external_href("HTTPS://example.com"));
    }

    #[test]
    fn only_external_links_get_a_target() {
        let mut doc = MemoryDocument::new();
        let external = doc.push(MemoryElement::new("a").attr("href", "https://example.com"));
        let local = doc.push(MemoryElement::new("a").attr("href", "/local/path"));
        let named = doc.push(MemoryElement::new("a").attr("name", "top"));

        assert_eq!(apply_external_target(&mut doc, Some("new")), 1);
        assert_eq!(doc.attribute(&external, "target").as_deref(), Some("new"));
        assert_eq!(doc.attribute(&local, "target"), None);
        assert_eq!(doc.attribute(&named, "target"), None);
        assert_eq!(doc.outer_html(local), "<a href=\"/local/path\"></a>");
    }

    #[test]
    fn empty_context_falls_back() {
        let mut doc = MemoryDocument::new();
        let link = doc.push(MemoryElement::new("a").attr("href", "http://example.com"));
        apply_external_target(&mut doc, Some(""));
        assert_eq!(doc.attribute(&link, "target").as_deref(), Some(DEFAULT_TARGET));
        apply_external_target(&mut doc, Some("docs"));
        assert_eq!(doc.attribute(&link, "target").as_deref(), Some("docs"));
    }
}
