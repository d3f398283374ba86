//! Derived note statistics.
//!
//! # Responsibility
//! - Compute collection counters for the stats panel.
//! - Compute per-note display metrics for list cards and the editor footer.
//!
//! # Invariants
//! - Every function is pure and recomputed from the current snapshot; no
//!   cached value can go stale across mutations.

use crate::model::note::{Note, Timestamp};

/// Aggregate counters for the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub total_notes: usize,
    pub total_words: usize,
}

/// Per-note display metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteSummary {
    pub word_count: usize,
    pub char_count: usize,
    pub modified: Timestamp,
}

pub fn total_notes(notes: &[Note]) -> usize {
    notes.len()
}

/// Sums content word counts, skipping blank content.
pub fn total_words(notes: &[Note]) -> usize {
    notes
        .iter()
        .map(Note::content)
        .filter(|content| !content.trim().is_empty())
        .map(word_count)
        .sum()
}

/// Counts whitespace-delimited tokens; blank text yields 0.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Counts characters (Unicode scalar values), whitespace included.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn note_summary(note: &Note) -> NoteSummary {
    NoteSummary {
        word_count: word_count(note.content()),
        char_count: char_count(note.content()),
        modified: note.modified(),
    }
}

pub fn collection_stats(notes: &[Note]) -> CollectionStats {
    CollectionStats {
        total_notes: total_notes(notes),
        total_words: total_words(notes),
    }
}

#[cfg(test)]
mod tests {
    use super::{char_count, word_count};

    #[test]
    fn word_count_handles_blank_and_repeated_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("a b  c"), 3);
        assert_eq!(word_count("\tline one\nline two "), 4);
    }

    #[test]
    fn char_count_counts_scalars_not_bytes() {
        assert_eq!(char_count("a b"), 3);
        assert_eq!(char_count("дом"), 3);
        assert_eq!(char_count(""), 0);
    }
}
