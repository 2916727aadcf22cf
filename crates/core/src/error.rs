//! Error types and annotation tallies.

use thiserror::Error;

/// Errors surfaced by the string-based page rewriter.
///
/// Live-page operations never fail: a missing marker, element or stored anchor
/// simply means nothing happens. Only the streaming rewriter and config parsing
/// can report errors.
#[derive(Debug, Error)]
pub enum DocPageError {
    /// lol_html rejected the input or a handler failed mid-stream.
    #[error("Rewrite error: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
    /// The page configuration could not be read.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors emitted while reading a [`PageConfig`](crate::PageConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON failed to parse or did not match the expected shape.
    #[error("Config parse error: {0}")]
    Parse(String),
    /// A field carried a value the page cannot use.
    #[error("Invalid value for `{field}`: {message}")]
    InvalidValue {
        /// Offending field name
        field: &'static str,
        /// Why it was rejected
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid-value error for a field
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// Tally of what one annotation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    /// Function-reference markers whose content was rewritten
    pub function_references: usize,
    /// Tagged spans replaced by hyperlinks
    pub tagged_spans: usize,
    /// Markers left untouched because their text or class did not match
    pub skipped: usize,
}

impl AnnotationReport {
    /// Total number of markers turned into links
    pub fn rewritten(&self) -> usize {
        self.function_references + self.tagged_spans
    }

    /// Check if anything was skipped
    pub fn has_skips(&self) -> bool {
        self.skipped > 0
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: AnnotationReport) {
        self.function_references += other.function_references;
        self.tagged_spans += other.tagged_spans;
        self.skipped += other.skipped;
    }
}
