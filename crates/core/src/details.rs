//! Open/closed state of `<details>` sections on documentation pages.

use crate::anchor::HASH_KEY;
use crate::document::{Document, Query, SessionStore};

/// `keyCode` values the documentation pages react to.
pub mod key_code {
    /// Digit `1` on the main row.
    pub const ONE: u32 = 49;
    /// `=`/`+` key.
    pub const PLUS: u32 = 187;
    /// `-` key.
    pub const MINUS: u32 = 189;
    /// `-` as reported by Firefox.
    pub const MINUS_FIREFOX: u32 = 173;
    /// Numeric keypad `-`.
    pub const MINUS_NUMPAD: u32 = 109;
}

/// What a key press does to the page's sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Flip every section based on one sample's state.
    ToggleAll,
    /// Open every section.
    OpenAll,
    /// Close every section.
    CloseAll,
}

impl KeyCommand {
    /// Maps a `keyCode`; unrecognized keys yield `None`.
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            key_code::ONE => Some(KeyCommand::ToggleAll),
            key_code::PLUS => Some(KeyCommand::OpenAll),
            key_code::MINUS | key_code::MINUS_FIREFOX | key_code::MINUS_NUMPAD => {
                Some(KeyCommand::CloseAll)
            }
            _ => None,
        }
    }

    /// Short name used by the browser bindings.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyCommand::ToggleAll => "toggle",
            KeyCommand::OpenAll => "open",
            KeyCommand::CloseAll => "close",
        }
    }
}

fn set_all<D: Document>(doc: &mut D, open: bool) -> usize {
    let sections = doc.query_all(&Query::element("details"));
    for section in &sections {
        doc.set_open(section, open);
    }
    sections.len()
}

/// Closes every `<details>` element. Returns how many were touched.
pub fn close_all_sections<D: Document>(doc: &mut D) -> usize {
    set_all(doc, false)
}

/// Opens every `<details>` element. Returns how many were touched.
pub fn open_all_sections<D: Document>(doc: &mut D) -> usize {
    set_all(doc, true)
}

/// Opens or closes everything depending on the first `<tag>-*` section.
///
/// Only that one sample is inspected; with mixed states the first section in
/// document order decides. Pages without such a section are left alone.
pub fn toggle_all_for_tag<D: Document>(doc: &mut D, tag: &str) -> Option<KeyCommand> {
    let Some(sample) = doc.query_first(&Query::class_prefix("details", format!("{tag}-"))) else {
        log::debug!("No details section for tag '{tag}' to toggle");
        return None;
    };
    if doc.is_open(&sample) {
        close_all_sections(doc);
        Some(KeyCommand::CloseAll)
    } else {
        open_all_sections(doc);
        Some(KeyCommand::OpenAll)
    }
}

/// Opens the section named by `anchor` (`details.<tag>-<anchor>`) and scrolls to it.
pub fn reveal_section<D: Document>(doc: &mut D, tag: &str, anchor: &str) -> bool {
    if anchor.is_empty() {
        return false;
    }
    let class = format!("{tag}-{}", anchor.to_lowercase());
    let Some(section) = doc.query_first(&Query::element_with_class("details", class)) else {
        log::debug!("No details section for anchor '{anchor}'");
        return false;
    };
    doc.set_open(&section, true);
    doc.scroll_into_view(&section);
    true
}

/// Opens the section matching the anchor captured in session storage.
pub fn reveal_from_anchor<D: Document, S: SessionStore>(doc: &mut D, store: &S, tag: &str) -> bool {
    match store.get(HASH_KEY) {
        Some(anchor) => reveal_section(doc, tag, &anchor),
        None => false,
    }
}

/// Applies the command bound to `code`, if any.
pub fn handle_key<D: Document>(doc: &mut D, code: u32, tag: &str) -> Option<KeyCommand> {
    let command = KeyCommand::from_key_code(code)?;
    match command {
        KeyCommand::ToggleAll => {
            toggle_all_for_tag(doc, tag);
        }
        KeyCommand::OpenAll => {
            open_all_sections(doc);
        }
        KeyCommand::CloseAll => {
            close_all_sections(doc);
        }
    }
    Some(command)
}
