//! Literal intent detection and option matching
//!
//! All matching is case-insensitive. Direct answers must equal an option;
//! replacement values in a change request only need to overlap one.

use super::state::SessionState;

const CHANGE_KEYWORD: &str = "change";
const REPLACEMENT_MARKER: &str = " to ";
const NEW_BOOKING_KEYWORDS: [&str; 3] = ["another", "new", "different"];

/// `lowered` must already be lowercase
pub fn mentions_change(lowered: &str) -> bool {
    lowered.contains(CHANGE_KEYWORD)
}

/// Whether the utterance carries a "... to <value>" part
pub fn has_replacement(lowered: &str) -> bool {
    lowered.contains(REPLACEMENT_MARKER)
}

pub fn wants_new_booking(lowered: &str) -> bool {
    NEW_BOOKING_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Index of the slot a change request refers to
///
/// The utterance must contain "change" and the slot's name, and the slot
/// must already hold a value. Lowest index wins.
pub fn change_target(state: &SessionState, lowered: &str) -> Option<usize> {
    if !mentions_change(lowered) {
        return None;
    }
    state.slot_order.iter().position(|name| {
        lowered.contains(name.to_lowercase().as_str()) && state.answer(name).is_some()
    })
}

/// Text after the first " to ", trimmed
pub fn replacement_fragment(lowered: &str) -> Option<&str> {
    lowered
        .split_once(REPLACEMENT_MARKER)
        .map(|(_, value)| value.trim())
}

/// First option overlapping `fragment` in either direction
pub fn match_fragment<'a>(options: &'a [String], fragment: &str) -> Option<&'a String> {
    let fragment = fragment.to_lowercase();
    options.iter().find(|option| {
        let option = option.to_lowercase();
        fragment.contains(option.as_str()) || option.contains(fragment.as_str())
    })
}

/// First option equal to the trimmed selection, ignoring case
pub fn match_exact<'a>(options: &'a [String], selection: &str) -> Option<&'a String> {
    let selection = selection.trim().to_lowercase();
    options.iter().find(|option| option.to_lowercase() == selection)
}
