//! In-memory implementations of the page capabilities.
//!
//! `MemoryDocument` is a flat list of elements rather than a tree: the page
//! logic only ever queries by tag and class and rewrites markup as strings,
//! so nesting is not modelled. Replaced elements stay in the list, detached,
//! so their final markup can still be inspected. Markers nested inside
//! tagged spans are covered by the `rewrite` tests, which run on real markup.

use std::collections::HashMap;

use crate::document::{Document, Location, Query, SessionStore};

/// Handle into a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One element of a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryElement {
    tag: String,
    attributes: Vec<(String, String)>,
    inner_html: String,
    open: bool,
    scrolled_into_view: bool,
    replaced_by: Option<String>,
}

impl MemoryElement {
    /// Creates an empty element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            inner_html: String::new(),
            open: false,
            scrolled_into_view: false,
            replaced_by: None,
        }
    }

    /// Sets the `class` attribute.
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Sets an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name.into(), value.into());
        self
    }

    /// Sets the inner markup.
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    /// Marks a `<details>` element as initially open.
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    fn set_attr(&mut self, name: String, value: String) {
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn class_attr(&self) -> &str {
        self.get_attr("class").unwrap_or("")
    }

    fn render(&self) -> String {
        if let Some(replacement) = &self.replaced_by {
            return replacement.clone();
        }
        let mut out = format!("<{}", self.tag);
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {name}=\"{value}\""));
        }
        if self.open {
            out.push_str(" open");
        }
        out.push('>');
        out.push_str(&self.inner_html);
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

/// Document made of standalone elements, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: Vec<MemoryElement>,
}

impl MemoryDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element and returns its handle.
    pub fn push(&mut self, element: MemoryElement) -> NodeId {
        self.elements.push(element);
        NodeId(self.elements.len() - 1)
    }

    /// Current markup of the element, or of whatever replaced it.
    pub fn outer_html(&self, node: NodeId) -> String {
        self.elements[node.0].render()
    }

    /// Whether the element was swapped out by `replace_outer_html`.
    pub fn is_replaced(&self, node: NodeId) -> bool {
        self.elements[node.0].replaced_by.is_some()
    }

    /// Whether `scroll_into_view` was called on the element.
    pub fn was_scrolled(&self, node: NodeId) -> bool {
        self.elements[node.0].scrolled_into_view
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn query_all(&self, query: &Query) -> Vec<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.replaced_by.is_none() && query.matches(&el.tag, el.class_attr()))
            .map(|(idx, _)| NodeId(idx))
            .collect()
    }

    fn class_name(&self, node: &NodeId) -> String {
        self.elements[node.0].class_attr().to_string()
    }

    fn inner_html(&self, node: &NodeId) -> String {
        self.elements[node.0].inner_html.clone()
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) {
        self.elements[node.0].inner_html = html.to_string();
    }

    fn replace_outer_html(&mut self, node: &NodeId, html: &str) {
        self.elements[node.0].replaced_by = Some(html.to_string());
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.elements[node.0].get_attr(name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.elements[node.0].set_attr(name.to_string(), value.to_string());
    }

    fn is_open(&self, node: &NodeId) -> bool {
        self.elements[node.0].open
    }

    fn set_open(&mut self, node: &NodeId, open: bool) {
        self.elements[node.0].open = open;
    }

    fn scroll_into_view(&mut self, node: &NodeId) {
        self.elements[node.0].scrolled_into_view = true;
    }
}

/// Fragment holder standing in for `window.location`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLocation {
    hash: String,
}

impl MemoryLocation {
    /// Location whose fragment is `hash` (with or without the leading `#`).
    pub fn with_fragment(hash: &str) -> Self {
        let hash = if hash.is_empty() || hash.starts_with('#') {
            hash.to_string()
        } else {
            format!("#{hash}")
        };
        Self { hash }
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> String {
        self.hash.clone()
    }

    fn clear_fragment(&mut self) {
        self.hash.clear();
    }
}

/// Session storage backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaced_nodes_drop_out_of_queries() {
        let mut doc = MemoryDocument::new();
        let span = doc.push(MemoryElement::new("span").class("ref-a").html("x"));
        let query = Query::class_prefix("span", "ref-");
        assert_eq!(doc.query_all(&query), vec![span]);

        doc.replace_outer_html(&span, "<a href=\"/doc/ref/#a\">x</a>");
        assert!(doc.query_all(&query).is_empty());
        assert!(doc.is_replaced(span));
        assert_eq!(doc.outer_html(span), "<a href=\"/doc/ref/#a\">x</a>");
    }

    #[test]
    fn renders_attributes_and_open_state() {
        let mut doc = MemoryDocument::new();
        let details = doc.push(MemoryElement::new("details").class("class-intro").open());
        assert_eq!(
            doc.outer_html(details),
            "<details class=\"class-intro\" open></details>"
        );
        doc.set_attribute(&details, "id", "intro");
        assert_eq!(doc.attribute(&details, "id").as_deref(), Some("intro"));
        assert_eq!(doc.class_name(&details), "class-intro");
    }

    #[test]
    fn location_normalizes_leading_hash() {
        assert_eq!(MemoryLocation::with_fragment("Intro").fragment(), "#Intro");
        assert_eq!(MemoryLocation::with_fragment("#Intro").fragment(), "#Intro");
        let mut loc = MemoryLocation::with_fragment("");
        assert_eq!(loc.fragment(), "");
        loc.clear_fragment();
        assert_eq!(loc.fragment(), "");
    }
}
