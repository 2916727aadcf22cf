//! Captures the URL fragment before the browser scrolls to it.
//!
//! Documentation pages keep their sections collapsed, so jumping to a
//! fragment natively lands on a closed `<details>`. The fragment is moved into
//! session storage and cleared instead, and [`crate::details`] opens the
//! matching section itself.

use crate::details::reveal_section;
use crate::document::{Document, Location, SessionStore};

/// Session storage key holding the last captured fragment.
pub const HASH_KEY: &str = "hash";

/// How the captured fragment is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FragmentCase {
    /// Store the fragment as written in the URL.
    Preserve,
    /// Store it lower-cased, matching section class names.
    #[default]
    Lowercase,
}

/// Moves the URL fragment into session storage and clears it from the URL.
///
/// Returns the stored value. An empty fragment (or a bare `#`) leaves storage
/// untouched; the URL fragment is cleared either way.
pub fn capture_and_clear_fragment<L: Location, S: SessionStore>(
    location: &mut L,
    store: &mut S,
    case: FragmentCase,
) -> Option<String> {
    let fragment = location.fragment();
    let raw = fragment.strip_prefix('#').unwrap_or(&fragment);
    let captured = if raw.is_empty() {
        None
    } else {
        let value = match case {
            FragmentCase::Preserve => raw.to_string(),
            FragmentCase::Lowercase => raw.to_lowercase(),
        };
        store.set(HASH_KEY, &value);
        Some(value)
    };
    location.clear_fragment();
    captured
}

/// Captures the fragment and opens the section it names.
///
/// Only the fragment of the current URL is revealed; an anchor stored by an
/// earlier page is left for [`check_details_state`].
pub fn check_anchor<D, L, S>(doc: &mut D, location: &mut L, store: &mut S, tag: &str) -> bool
where
    D: Document,
    L: Location,
    S: SessionStore,
{
    match capture_and_clear_fragment(location, store, FragmentCase::Lowercase) {
        Some(anchor) => reveal_section(doc, tag, &anchor),
        None => false,
    }
}

/// Encodes the single-entry open list (`["anchor"]`).
pub fn encode_open_list(anchor: &str) -> String {
    serde_json::to_string(&[anchor]).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes an open list; anything but a JSON array of strings is ignored.
pub fn decode_open_list(raw: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => Some(list),
        Err(err) => {
            log::debug!("Ignoring malformed open list {:?}: {}", raw, err);
            None
        }
    }
}

/// Records the captured anchor in `open_list` and opens the section it names.
///
/// The list survives a later navigation without a fragment, so the last
/// requested section reopens when the reader comes back within the session.
pub fn check_details_state<D: Document, S: SessionStore>(
    doc: &mut D,
    store: &mut S,
    open_list: &str,
    tag: &str,
) -> bool {
    if let Some(anchor) = store.get(HASH_KEY) {
        store.set(open_list, &encode_open_list(&anchor));
    }
    let Some(list) = store.get(open_list).as_deref().and_then(decode_open_list) else {
        return false;
    };
    match list.first() {
        Some(anchor) => reveal_section(doc, tag, anchor),
        None => false,
    }
}
