//! Page-load lifecycle: DOM ready, full load, key presses.

use crate::anchor::{FragmentCase, capture_and_clear_fragment, check_details_state};
use crate::annotate::annotate_links;
use crate::config::PageConfig;
use crate::details::{KeyCommand, handle_key, reveal_section};
use crate::document::{Document, Location, SessionStore};
use crate::error::AnnotationReport;
use crate::external::apply_external_target;

/// What the DOM-ready pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Fragment moved into session storage, if the URL carried one.
    pub captured_anchor: Option<String>,
    /// Marker annotation tally.
    pub annotation: AnnotationReport,
    /// Whether a details section was opened from the anchor.
    pub revealed: bool,
}

/// Runs the documentation page hooks against injected capabilities.
#[derive(Debug, Clone, Default)]
pub struct DocPageAnnotator {
    config: PageConfig,
    annotated: bool,
}

impl DocPageAnnotator {
    /// Creates an annotator for one page load.
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            annotated: false,
        }
    }

    /// Whether `dom_ready` already ran.
    pub fn is_annotated(&self) -> bool {
        self.annotated
    }

    /// DOM-ready hook.
    ///
    /// Captures and clears the fragment first so the browser never scrolls to
    /// it, then annotates markers, then opens the section the fragment named.
    /// Annotation rewrites markup in place, so later calls are refused.
    pub fn dom_ready<D, L, S>(&mut self, doc: &mut D, location: &mut L, store: &mut S) -> PageReport
    where
        D: Document,
        L: Location,
        S: SessionStore,
    {
        if self.annotated {
            log::warn!("Documentation page already annotated; ignoring repeated DOM-ready");
            return PageReport::default();
        }
        self.annotated = true;

        let case = if self.config.lowercase_anchor() {
            FragmentCase::Lowercase
        } else {
            FragmentCase::Preserve
        };
        let captured_anchor = capture_and_clear_fragment(location, store, case);
        let annotation = annotate_links(doc);

        // Without an open list only this load's fragment counts; a value left in
        // storage by an earlier page must not reopen sections here.
        let tag = self.config.details_tag();
        let revealed = match (self.config.open_list(), captured_anchor.as_deref()) {
            (Some(open_list), _) => check_details_state(doc, store, open_list, tag),
            (None, Some(anchor)) => reveal_section(doc, tag, anchor),
            (None, None) => false,
        };

        PageReport {
            captured_anchor,
            annotation,
            revealed,
        }
    }

    /// Full-load hook: external links. Returns how many links were updated.
    pub fn loaded<D: Document>(&self, doc: &mut D) -> usize {
        if !self.config.rewrite_external_links() {
            return 0;
        }
        apply_external_target(doc, Some(self.config.external_target()))
    }

    /// Key-down hook for documentation pages.
    pub fn key_pressed<D: Document>(&self, doc: &mut D, key_code: u32) -> Option<KeyCommand> {
        handle_key(doc, key_code, self.config.details_tag())
    }
}
