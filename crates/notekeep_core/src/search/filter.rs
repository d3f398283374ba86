//! Case-insensitive substring filter over note title and content.
//!
//! # Invariants
//! - Blank queries return every note in input order.
//! - Matches keep input order; there is no ranking.
//! - The query is matched as typed (lowercased, not trimmed or tokenized).

use crate::model::note::Note;

/// Returns the notes whose title or content contains `query`, ignoring case.
pub fn filter<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    if query.trim().is_empty() {
        return notes.iter().collect();
    }

    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| matches_note(note, &needle))
        .collect()
}

/// Returns whether `note` matches an already-lowercased `needle`.
fn matches_note(note: &Note, needle: &str) -> bool {
    note.title().to_lowercase().contains(needle) || note.content().to_lowercase().contains(needle)
}
