//! Field extraction for the index builders
//!
//! The builders read three views of a record: its candidate name strings,
//! the capitalized words inside its multi-word names, and every
//! modification timestamp touching the record or its subobjects. Extraction
//! never normalizes or deduplicates; that happens in the builders.

use gazetteer_core::Place;
use serde_json::Value;

/// Collect a record's candidate name strings
///
/// Candidates are the `/`-separated pieces of the title, every name-object's
/// `attested` string when present, and every comma-separated piece of each
/// name-object's `romanized` string. Pieces are trimmed and empty pieces
/// discarded. Order follows the record; duplicates are kept.
pub(crate) fn name_candidates(place: &Place) -> Vec<String> {
    let mut candidates = Vec::new();
    for piece in place.title().split('/') {
        push_trimmed(&mut candidates, piece);
    }
    for name in place.names() {
        if let Some(attested) = name.get("attested").and_then(Value::as_str) {
            push_trimmed(&mut candidates, attested);
        }
        if let Some(romanized) = name.get("romanized").and_then(Value::as_str) {
            for piece in romanized.split(',') {
                push_trimmed(&mut candidates, piece);
            }
        }
    }
    candidates
}

fn push_trimmed(candidates: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        candidates.push(trimmed.to_string());
    }
}

/// Extract the capitalized words of multi-word candidate names
///
/// Only candidates containing an ASCII space contribute. From those, every
/// whitespace-separated word whose first character is uppercase is kept.
/// This is a heuristic for proper-noun components in Latin-scripted
/// romanized names; it selects nothing in uncased scripts.
pub(crate) fn capitalized_words(candidates: &[String]) -> Vec<String> {
    let mut words = Vec::new();
    for candidate in candidates {
        if !candidate.contains(' ') {
            continue;
        }
        for word in candidate.split_whitespace() {
            if word.chars().next().map_or(false, char::is_uppercase) {
                words.push(word.to_string());
            }
        }
    }
    words
}

/// Gather every modification timestamp slot touching a record
///
/// Takes the record's own `created`, each of its `history[].modified`
/// stamps, and the same two fields of every location and name subobject.
/// Absent keys contribute nothing; a present slot is returned raw whatever
/// its JSON type, so the caller can reject non-string stamps.
pub(crate) fn timestamps(place: &Place) -> Vec<&Value> {
    let mut stamps = Vec::new();
    if let Some(created) = place.data().get("created") {
        stamps.push(created);
    }
    collect_modified(place.history(), &mut stamps);
    for subobject in place.locations().iter().chain(place.names()) {
        if let Some(created) = subobject.get("created") {
            stamps.push(created);
        }
        if let Some(history) = subobject.get("history").and_then(Value::as_array) {
            collect_modified(history, &mut stamps);
        }
    }
    stamps
}

fn collect_modified<'a>(events: &'a [Value], stamps: &mut Vec<&'a Value>) {
    for event in events {
        if let Some(modified) = event.get("modified") {
            stamps.push(modified);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
