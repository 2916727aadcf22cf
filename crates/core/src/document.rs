//! Capabilities the page logic runs against.
//!
//! The annotator never touches a browser API directly. It is handed a
//! [`Document`], a [`Location`] and a [`SessionStore`]; the wasm crate binds
//! them to the live page and [`crate::memory`] provides in-memory versions.

use std::fmt;

/// Element lookups the page logic needs, rendered to CSS for real DOMs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Any element carrying the class token (`.mhcf`).
    Class(String),
    /// Every element with the given tag name (`details`, `a`).
    Element(String),
    /// Elements of one tag carrying a class token (`details.class-intro`).
    ElementWithClass {
        /// Tag name
        element: String,
        /// Class token
        class: String,
    },
    /// Elements of one tag whose class attribute starts with a prefix
    /// (`span[class^="ref-"]`).
    ClassPrefix {
        /// Tag name
        element: String,
        /// Required start of the class attribute
        prefix: String,
    },
}

impl Query {
    /// `.class`
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// `element`
    pub fn element(element: impl Into<String>) -> Self {
        Self::Element(element.into())
    }

    /// `element.class`
    pub fn element_with_class(element: impl Into<String>, class: impl Into<String>) -> Self {
        Self::ElementWithClass {
            element: element.into(),
            class: class.into(),
        }
    }

    /// `element[class^="prefix"]`
    pub fn class_prefix(element: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::ClassPrefix {
            element: element.into(),
            prefix: prefix.into(),
        }
    }

    /// Renders the query as a CSS selector for `querySelectorAll`.
    pub fn to_css(&self) -> String {
        match self {
            Query::Class(class) => format!(".{class}"),
            Query::Element(element) => element.clone(),
            Query::ElementWithClass { element, class } => format!("{element}.{class}"),
            Query::ClassPrefix { element, prefix } => {
                format!("{element}[class^=\"{}\"]", prefix.replace('"', "\\\""))
            }
        }
    }

    /// Whether an element with this tag and class attribute satisfies the query.
    ///
    /// Used by in-memory documents; tag names compare case-insensitively and
    /// class tokens compare exactly, as in HTML documents.
    pub fn matches(&self, tag: &str, class_attr: &str) -> bool {
        let has_token = |token: &str| class_attr.split_ascii_whitespace().any(|t| t == token);
        match self {
            Query::Class(class) => has_token(class),
            Query::Element(element) => tag.eq_ignore_ascii_case(element),
            Query::ElementWithClass { element, class } => {
                tag.eq_ignore_ascii_case(element) && has_token(class)
            }
            Query::ClassPrefix { element, prefix } => {
                tag.eq_ignore_ascii_case(element) && class_attr.starts_with(prefix.as_str())
            }
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Query and mutation surface of a rendered page.
///
/// Nodes are opaque handles; a node that has been replaced through
/// [`Document::replace_outer_html`] must not be returned by later queries.
pub trait Document {
    /// Handle to one element.
    type Node;

    /// All elements matching the query, in document order.
    fn query_all(&self, query: &Query) -> Vec<Self::Node>;

    /// First element matching the query.
    fn query_first(&self, query: &Query) -> Option<Self::Node> {
        self.query_all(query).into_iter().next()
    }

    /// The element's full `class` attribute (empty when absent).
    fn class_name(&self, node: &Self::Node) -> String;

    /// Serialized children of the element.
    fn inner_html(&self, node: &Self::Node) -> String;

    /// Replaces the element's children with parsed markup.
    fn set_inner_html(&mut self, node: &Self::Node, html: &str);

    /// Replaces the element itself with parsed markup.
    fn replace_outer_html(&mut self, node: &Self::Node, html: &str);

    /// Attribute value, `None` when absent.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Sets or overwrites an attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Open state of a `<details>` element.
    fn is_open(&self, node: &Self::Node) -> bool;

    /// Opens or closes a `<details>` element.
    fn set_open(&mut self, node: &Self::Node, open: bool);

    /// Scrolls the element into the viewport.
    fn scroll_into_view(&mut self, node: &Self::Node);

    /// Whether the element carries the class token.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool {
        self.class_name(node)
            .split_ascii_whitespace()
            .any(|token| token == class)
    }
}

/// The page URL's fragment identifier.
pub trait Location {
    /// Current fragment including its leading `#`, or empty.
    fn fragment(&self) -> String;

    /// Sets the fragment to empty.
    fn clear_fragment(&mut self);
}

/// Key/value storage scoped to the browser tab's session.
pub trait SessionStore {
    /// Stored value for the key.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value under the key.
    fn set(&mut self, key: &str, value: &str);
}
