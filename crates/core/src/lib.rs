#![deny(missing_docs)]
//! Documentation page annotation: marker links, fragment capture, details toggling.

/// URL fragment capture and open-list bookkeeping.
pub mod anchor;
/// Marker-to-hyperlink rewriting.
pub mod annotate;
/// Page configuration.
pub mod config;
/// Details section open/close state and key bindings.
pub mod details;
/// Capability traits the page logic runs against.
pub mod document;
/// Error types and annotation tallies.
pub mod error;
/// External link targets.
pub mod external;
/// In-memory document, location and session storage.
pub mod memory;
/// Page lifecycle hooks.
pub mod page;
/// Streaming rewriter over serialized HTML.
pub mod rewrite;

pub use anchor::{
    FragmentCase, HASH_KEY, capture_and_clear_fragment, check_anchor, check_details_state,
};
pub use annotate::{
    DocLinkTag, FunctionReference, Modifiers, annotate_function_references, annotate_links,
    annotate_tagged_spans, parse_function_reference, render_function_reference,
};
pub use config::PageConfig;
pub use details::{
    KeyCommand, close_all_sections, handle_key, key_code, open_all_sections, reveal_from_anchor,
    reveal_section, toggle_all_for_tag,
};
pub use document::{Document, Location, Query, SessionStore};
pub use error::{AnnotationReport, ConfigError, DocPageError};
pub use external::{DEFAULT_TARGET, apply_external_target, is_external_href};
pub use memory::{MemoryDocument, MemoryElement, MemoryLocation, MemoryStore, NodeId};
pub use page::{DocPageAnnotator, PageReport};
pub use rewrite::annotate_html;
