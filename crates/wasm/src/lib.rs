//! Browser entry points for documentation pages.
//!
//! A small loader script wires these to page events:
//!
//! ```javascript
//! import init_wasm, { init, dom_ready, page_loaded, key_down } from './docpage_wasm';
//!
//! await init_wasm();
//! init({ detailsTag: 'class' });
//! document.addEventListener('DOMContentLoaded', () => dom_ready());
//! window.addEventListener('load', () => page_loaded());
//! document.addEventListener('keydown', (event) => key_down(event.keyCode));
//! ```

use std::cell::RefCell;

use docpage_core::{DocPageAnnotator, PageConfig};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

/// Live-DOM implementations of the page capabilities.
pub mod browser;

use browser::{BrowserDocument, BrowserSessionStore, WindowLocation};

thread_local! {
    static ANNOTATOR: RefCell<DocPageAnnotator> = RefCell::new(DocPageAnnotator::default());
}

fn parse_config(config: JsValue) -> Result<PageConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(PageConfig::default());
    }
    let config: PageConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    config
        .validate()
        .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(config)
}

// ============================================================================
// Summary Types
// ============================================================================

/// What the DOM-ready pass did, as handed back to JavaScript.
#[derive(Debug, Clone, Serialize)]
pub struct DomReadySummary {
    /// Fragment moved into session storage.
    pub captured_anchor: Option<String>,
    /// Markers turned into links.
    pub rewritten: usize,
    /// Markers left untouched.
    pub skipped: usize,
    /// Whether a details section was opened.
    pub revealed: bool,
}

// ============================================================================
// Page Lifecycle API
// ============================================================================

/// Configures the page hooks. Call before `dom_ready`.
#[wasm_bindgen]
pub fn init(config: JsValue) -> Result<(), JsError> {
    let config = parse_config(config)?;
    ANNOTATOR.with(|annotator| *annotator.borrow_mut() = DocPageAnnotator::new(config));
    Ok(())
}

/// `DOMContentLoaded` hook: fragment capture, marker links, anchor reveal.
#[wasm_bindgen]
pub fn dom_ready() -> Result<JsValue, JsError> {
    let report = ANNOTATOR.with(|annotator| {
        annotator.borrow_mut().dom_ready(
            &mut BrowserDocument,
            &mut WindowLocation,
            &mut BrowserSessionStore,
        )
    });
    let summary = DomReadySummary {
        captured_anchor: report.captured_anchor,
        rewritten: report.annotation.rewritten(),
        skipped: report.annotation.skipped,
        revealed: report.revealed,
    };
    serde_wasm_bindgen::to_value(&summary)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// `load` hook: external links open in the configured context.
#[wasm_bindgen]
pub fn page_loaded() -> usize {
    ANNOTATOR.with(|annotator| annotator.borrow().loaded(&mut BrowserDocument))
}

/// `keydown` hook. Returns the command applied (`toggle`, `open`, `close`).
#[wasm_bindgen]
pub fn key_down(key_code: u32) -> Option<String> {
    ANNOTATOR.with(|annotator| {
        annotator
            .borrow()
            .key_pressed(&mut BrowserDocument, key_code)
            .map(|command| command.as_str().to_string())
    })
}

// ============================================================================
// String API
// ============================================================================

/// Annotates serialized HTML without a DOM (workers, prerendering).
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { annotate_html } from './docpage_wasm';
///
/// annotate_html('<span class="mhcf">HumdrumFile::read</span>');
/// // '<span class="mhcf"><a href="/doc/class/HumdrumFile">HumdrumFile</a>::<a href="/doc/class/HumdrumFile#read">read</a></span>'
/// ```
#[wasm_bindgen]
pub fn annotate_html(html: &str, config: JsValue) -> Result<String, JsError> {
    let config = parse_config(config)?;
    docpage_core::annotate_html(html, &config).map_err(|e| JsError::new(&e.to_string()))
}
