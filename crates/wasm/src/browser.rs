//! Live-page implementations of the docpage capabilities.
//!
//! Bound directly through `wasm-bindgen` extern blocks; only the handful of
//! DOM members the page hooks touch are declared.

use docpage_core::{Document, Location, Query, SessionStore};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// `window.document`.
    pub type HtmlDocument;

    #[wasm_bindgen(thread_local_v2, js_name = document)]
    static DOCUMENT: HtmlDocument;

    #[wasm_bindgen(method, catch, js_name = querySelectorAll)]
    fn query_selector_all(this: &HtmlDocument, selector: &str) -> Result<JsValue, JsValue>;

    /// Any DOM element.
    #[derive(Clone)]
    pub type DomElement;

    #[wasm_bindgen(method, getter = className)]
    fn class_name(this: &DomElement) -> String;

    #[wasm_bindgen(method, getter = innerHTML)]
    fn inner_html(this: &DomElement) -> String;

    #[wasm_bindgen(method, setter = innerHTML)]
    fn set_inner_html(this: &DomElement, html: &str);

    #[wasm_bindgen(method, setter = outerHTML)]
    fn set_outer_html(this: &DomElement, html: &str);

    #[wasm_bindgen(method, js_name = getAttribute)]
    fn get_attribute(this: &DomElement, name: &str) -> Option<String>;

    #[wasm_bindgen(method, catch, js_name = setAttribute)]
    fn set_attribute(this: &DomElement, name: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, getter)]
    fn open(this: &DomElement) -> bool;

    #[wasm_bindgen(method, setter = open)]
    fn set_open(this: &DomElement, open: bool);

    #[wasm_bindgen(method, js_name = scrollIntoView)]
    fn scroll_into_view(this: &DomElement);

    /// `window.location`.
    pub type BrowserLocation;

    #[wasm_bindgen(thread_local_v2, js_name = location)]
    static LOCATION: BrowserLocation;

    #[wasm_bindgen(method, getter)]
    fn hash(this: &BrowserLocation) -> String;

    #[wasm_bindgen(method, setter = hash)]
    fn set_hash(this: &BrowserLocation, hash: &str);

    /// `window.sessionStorage`.
    pub type Storage;

    #[wasm_bindgen(thread_local_v2, js_name = sessionStorage)]
    static SESSION_STORAGE: Storage;

    #[wasm_bindgen(method, catch, js_name = getItem)]
    fn get_item(this: &Storage, key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setItem)]
    fn set_item(this: &Storage, key: &str, value: &str) -> Result<(), JsValue>;
}

/// The page's `document`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserDocument;

impl Document for BrowserDocument {
    type Node = DomElement;

    fn query_all(&self, query: &Query) -> Vec<DomElement> {
        // Anchors taken from the URL can make the selector invalid; that is "no match".
        match DOCUMENT.with(|doc| doc.query_selector_all(&query.to_css())) {
            Ok(list) => js_sys::Array::from(&list)
                .iter()
                .map(|node| node.unchecked_into::<DomElement>())
                .collect(),
            Err(_) => {
                log::debug!("Invalid selector `{query}`");
                Vec::new()
            }
        }
    }

    fn class_name(&self, node: &DomElement) -> String {
        node.class_name()
    }

    fn inner_html(&self, node: &DomElement) -> String {
        node.inner_html()
    }

    fn set_inner_html(&mut self, node: &DomElement, html: &str) {
        node.set_inner_html(html);
    }

    fn replace_outer_html(&mut self, node: &DomElement, html: &str) {
        node.set_outer_html(html);
    }

    fn attribute(&self, node: &DomElement, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &DomElement, name: &str, value: &str) {
        if node.set_attribute(name, value).is_err() {
            log::debug!("Could not set attribute {name:?}");
        }
    }

    fn is_open(&self, node: &DomElement) -> bool {
        node.open()
    }

    fn set_open(&mut self, node: &DomElement, open: bool) {
        node.set_open(open);
    }

    fn scroll_into_view(&mut self, node: &DomElement) {
        node.scroll_into_view();
    }
}

/// The page's `location`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowLocation;

impl Location for WindowLocation {
    fn fragment(&self) -> String {
        LOCATION.with(|location| location.hash())
    }

    fn clear_fragment(&mut self) {
        LOCATION.with(|location| location.set_hash(""));
    }
}

/// The tab's `sessionStorage`. Storage failures (quota, privacy mode) read as empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSessionStore;

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        SESSION_STORAGE
            .with(|storage| storage.get_item(key))
            .ok()
            .flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if SESSION_STORAGE
            .with(|storage| storage.set_item(key, value))
            .is_err()
        {
            log::debug!("sessionStorage rejected key {key:?}");
        }
    }
}
