//! In-memory note store.
//!
//! # Responsibility
//! - Own the ordered note collection and assign note identity.
//! - Provide create/update/delete plus bulk replace/append for loads.
//!
//! # Invariants
//! - Ids come from a monotonic counter. Once the counter passes
//!   `NoteId::MAX`, the smallest id not held by a live note is used instead.
//! - No two notes in the collection share an id.
//! - Every successful mutation bumps the revision; reads never do.
//! - Store order is newest-created first; edits never reorder.
//! - Every mutation checks existence before touching the collection, so a
//!   failed call leaves the store unchanged.

use crate::model::note::{Note, NoteId};
use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for id-addressed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    NotFound(NoteId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Field-level edit request; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteEdit {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            content: None,
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(value.into()),
        }
    }
}

/// Ordered, exclusively-owned note collection.
#[derive(Debug, Clone)]
pub struct NoteStore {
    notes: Vec<Note>,
    /// `None` once the counter has handed out `NoteId::MAX`.
    next_id: Option<NoteId>,
    revision: u64,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            next_id: Some(0),
            revision: 0,
        }
    }
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `notes` in the given order.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        let mut store = Self::new();
        store.replace_all(notes);
        store
    }

    /// Allocates a new note stamped `created = modified = now` and prepends it.
    pub fn create(&mut self, title: impl Into<String>, content: impl Into<String>) -> Note {
        let id = self.allocate_id(&HashSet::new());
        let note = Note::new(id, title, content);
        self.notes.insert(0, note.clone());
        self.touch();
        debug!(
            "event=note_create module=store status=ok note_id={} total={}",
            id,
            self.notes.len()
        );
        note
    }

    /// Applies `edit` to the note with `id` and stamps `modified`.
    ///
    /// An edit carrying no fields still counts as a touch.
    pub fn update(&mut self, id: NoteId, edit: NoteEdit) -> StoreResult<Note> {
        let note = self.find_mut(id)?;
        note.apply_edit(edit.title, edit.content);
        let updated = note.clone();
        self.touch();
        Ok(updated)
    }

    /// Resets title and content of the note with `id` to empty strings.
    pub fn clear(&mut self, id: NoteId) -> StoreResult<Note> {
        self.update(
            id,
            NoteEdit {
                title: Some(String::new()),
                content: Some(String::new()),
            },
        )
    }

    /// Removes and returns the note with `id`.
    pub fn delete(&mut self, id: NoteId) -> StoreResult<Note> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let removed = self.notes.remove(index);
        self.touch();
        debug!(
            "event=note_delete module=store status=ok note_id={} total={}",
            id,
            self.notes.len()
        );
        Ok(removed)
    }

    /// Discards the current collection and installs `notes` in order.
    ///
    /// Ids are kept verbatim, except that a repeated id gets a fresh one so
    /// the collection stays collision-free. The counter moves past every
    /// installed id.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.next_id = match notes.iter().map(Note::id).max() {
            Some(max_id) => max_id.checked_add(1),
            None => Some(0),
        };
        self.notes = Vec::with_capacity(notes.len());

        let mut taken = notes.iter().map(Note::id).collect::<HashSet<_>>();
        let mut seen = HashSet::with_capacity(notes.len());
        let mut reassigned = 0usize;
        for mut note in notes {
            if !seen.insert(note.id()) {
                let fresh = self.allocate_id(&taken);
                note.assign_id(fresh);
                taken.insert(fresh);
                seen.insert(fresh);
                reassigned += 1;
            }
            note.normalize_timestamps();
            self.notes.push(note);
        }
        self.touch();

        debug!(
            "event=store_replace module=store status=ok total={} reassigned={}",
            self.notes.len(),
            reassigned
        );
    }

    /// Appends `notes` after the current collection with freshly assigned ids.
    ///
    /// Returns the ids given to the appended notes, in order.
    pub fn append_all(&mut self, notes: Vec<Note>) -> Vec<NoteId> {
        let mut assigned = Vec::with_capacity(notes.len());
        for mut note in notes {
            let id = self.allocate_id(&HashSet::new());
            note.assign_id(id);
            note.normalize_timestamps();
            self.notes.push(note);
            assigned.push(id);
        }
        self.touch();
        debug!(
            "event=store_append module=store status=ok appended={} total={}",
            assigned.len(),
            self.notes.len()
        );
        assigned
    }

    /// Notes in store order (newest-created first).
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn find_by_id(&self, id: NoteId) -> StoreResult<&Note> {
        self.notes
            .iter()
            .find(|note| note.id() == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.position(id).is_some()
    }

    /// Point-in-time copy of the collection for background I/O.
    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.clone()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Mutation counter; equal revisions mean identical collections.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Hands out the next counter value, or the smallest id not held by a
    /// live note nor listed in `reserved` once the counter is exhausted.
    fn allocate_id(&mut self, reserved: &HashSet<NoteId>) -> NoteId {
        if let Some(id) = self.next_id {
            self.next_id = id.checked_add(1);
            return id;
        }

        let live = self.notes.iter().map(Note::id).collect::<HashSet<_>>();
        let mut candidate: NoteId = 0;
        while live.contains(&candidate) || reserved.contains(&candidate) {
            candidate += 1;
        }
        candidate
    }

    fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id() == id)
    }

    fn find_mut(&mut self, id: NoteId) -> StoreResult<&mut Note> {
        self.notes
            .iter_mut()
            .find(|note| note.id() == id)
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteEdit, NoteStore, StoreError};
    use crate::model::note::Note;

    #[test]
    fn ids_are_not_reused_after_deleting_an_earlier_note() {
        let mut store = NoteStore::new();
        let first = store.create("a", "");
        let second = store.create("b", "");
        store.delete(first.id()).unwrap();

        let third = store.create("c", "");
        assert_ne!(third.id(), second.id());
        assert_ne!(third.id(), first.id());
    }

    #[test]
    fn update_missing_note_returns_not_found() {
        let mut store = NoteStore::new();
        store.create("a", "b");
        let error = store.update(42, NoteEdit::title("x")).unwrap_err();
        assert_eq!(error, StoreError::NotFound(42));
        assert_eq!(store.list()[0].title(), "a");
    }

    #[test]
    fn replace_all_renumbers_repeated_ids() {
        let mut store = NoteStore::new();
        store.replace_all(vec![
            Note::new(3, "x", ""),
            Note::new(3, "y", ""),
            Note::new(1, "z", ""),
        ]);
        let ids = store.list().iter().map(Note::id).collect::<Vec<_>>();
        assert_eq!(ids, vec![3, 4, 1]);

        let created = store.create("new", "");
        assert_eq!(created.id(), 5);
    }

    #[test]
    fn exhausted_counter_falls_back_to_smallest_free_id() {
        let mut store = NoteStore::new();
        store.replace_all(vec![Note::new(0, "low", ""), Note::new(u64::MAX, "top", "")]);
        assert_eq!(store.next_id, None);

        assert_eq!(store.create("a", "").id(), 1);
        assert_eq!(store.create("b", "").id(), 2);
    }

    #[test]
    fn revision_moves_only_on_successful_mutation() {
        let mut store = NoteStore::new();
        let note = store.create("a", "");
        let after_create = store.revision();
        assert!(after_create > 0);

        assert!(store.delete(999).is_err());
        let _ = store.find_by_id(note.id());
        let _ = store.snapshot();
        assert_eq!(store.revision(), after_create);

        store.update(note.id(), NoteEdit::title("b")).unwrap();
        assert!(store.revision() > after_create);
    }
}
