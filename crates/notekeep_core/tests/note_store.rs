use notekeep_core::{Note, NoteEdit, NoteStore, StoreError, Timestamp, TIMESTAMP_FORMAT};
use std::collections::HashSet;

fn at(raw: &str) -> Timestamp {
    Timestamp::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap()
}

fn ids(store: &NoteStore) -> Vec<u64> {
    store.list().iter().map(Note::id).collect()
}

fn assert_unique_ids(store: &NoteStore) {
    let unique = store.list().iter().map(Note::id).collect::<HashSet<_>>();
    assert_eq!(unique.len(), store.len(), "duplicate ids in {:?}", ids(store));
}

#[test]
fn create_prepends_and_delete_removes_by_identity() {
    let mut store = NoteStore::new();
    let a = store.create("Note1", "hello");
    let b = store.create("Note2", "world");
    assert_eq!(ids(&store), vec![b.id(), a.id()]);

    store.delete(a.id()).unwrap();
    assert_eq!(ids(&store), vec![b.id()]);
    assert_eq!(store.list()[0].title(), "Note2");
}

#[test]
fn mixed_create_update_delete_sequences_never_duplicate_ids() {
    let mut store = NoteStore::new();
    let mut live = Vec::new();
    for round in 0..40u64 {
        let note = store.create(format!("n{round}"), "");
        live.push(note.id());
        if round % 3 == 0 {
            let victim = live.remove(0);
            store.delete(victim).unwrap();
        }
        if round % 5 == 0 {
            if let Some(&target) = live.last() {
                store.update(target, NoteEdit::content("edited")).unwrap();
            }
        }
        assert_unique_ids(&store);
    }
}

#[test]
fn deleting_missing_id_leaves_store_unchanged() {
    let mut store = NoteStore::new();
    store.create("a", "1");
    store.create("b", "2");
    let before = store.snapshot();

    let error = store.delete(999).unwrap_err();
    assert_eq!(error, StoreError::NotFound(999));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn update_applies_only_provided_fields_and_keeps_order() {
    let mut store = NoteStore::new();
    store.replace_all(vec![
        Note::with_timestamps(1, "first", "body one", at("2023-01-01 10:00:00"), at("2023-01-01 10:00:00")),
        Note::with_timestamps(0, "second", "body two", at("2022-12-31 10:00:00"), at("2022-12-31 10:00:00")),
    ]);

    let updated = store.update(0, NoteEdit::title("renamed")).unwrap();
    assert_eq!(updated.title(), "renamed");
    assert_eq!(updated.content(), "body two");
    assert_eq!(updated.created(), at("2022-12-31 10:00:00"));
    assert!(updated.modified() > updated.created());
    assert_eq!(ids(&store), vec![1, 0]);
}

#[test]
fn empty_edit_still_touches_modified() {
    let mut store = NoteStore::from_notes(vec![Note::with_timestamps(
        5,
        "t",
        "c",
        at("2021-06-01 00:00:00"),
        at("2021-06-01 00:00:00"),
    )]);
    let touched = store.update(5, NoteEdit::default()).unwrap();
    assert_eq!(touched.title(), "t");
    assert!(touched.modified() > at("2021-06-01 00:00:00"));
}

#[test]
fn clear_empties_title_and_content() {
    let mut store = NoteStore::new();
    let note = store.create("title", "content");
    let cleared = store.clear(note.id()).unwrap();
    assert_eq!(cleared.title(), "");
    assert_eq!(cleared.content(), "");
    assert_eq!(store.clear(12345).unwrap_err(), StoreError::NotFound(12345));
}

#[test]
fn replace_all_keeps_order_and_advances_counter() {
    let mut store = NoteStore::new();
    store.create("discarded", "");
    store.replace_all(vec![Note::new(10, "x", ""), Note::new(2, "y", "")]);
    assert_eq!(ids(&store), vec![10, 2]);

    let created = store.create("z", "");
    assert!(created.id() > 10);
    assert_unique_ids(&store);
}

#[test]
fn append_all_assigns_fresh_ids_after_existing_notes() {
    let mut store = NoteStore::new();
    let existing = store.create("mine", "");
    let assigned = store.append_all(vec![
        Note::new(existing.id(), "theirs 1", ""),
        Note::new(existing.id(), "theirs 2", ""),
    ]);

    assert_eq!(assigned.len(), 2);
    assert!(assigned.iter().all(|id| *id != existing.id()));
    let titles = store.list().iter().map(Note::title).collect::<Vec<_>>();
    assert_eq!(titles, vec!["mine", "theirs 1", "theirs 2"]);
    assert_unique_ids(&store);
}

#[test]
fn find_by_id_reports_missing_notes() {
    let mut store = NoteStore::new();
    let note = store.create("present", "");
    assert_eq!(store.find_by_id(note.id()).unwrap().title(), "present");
    assert_eq!(store.find_by_id(77).unwrap_err(), StoreError::NotFound(77));
}

#[test]
fn created_notes_satisfy_timestamp_invariant() {
    let mut store = NoteStore::new();
    let note = store.create("a", "b");
    assert_eq!(note.created(), note.modified());
    let edited = store.update(note.id(), NoteEdit::content("c")).unwrap();
    assert!(edited.modified() >= edited.created());
}

#[test]
fn loaded_max_id_does_not_collide_with_later_ids() {
    let mut store = NoteStore::new();
    store.replace_all(vec![
        Note::new(u64::MAX, "loaded", ""),
        Note::new(u64::MAX, "duplicate", ""),
    ]);
    assert_unique_ids(&store);

    let created = store.create("new", "");
    assert_ne!(created.id(), u64::MAX);
    assert_unique_ids(&store);

    store
        .update(u64::MAX, NoteEdit::content("still reachable"))
        .unwrap();
    assert_eq!(store.find_by_id(u64::MAX).unwrap().title(), "loaded");
    store.delete(u64::MAX).unwrap();
    assert_eq!(store.len(), 2);
    assert_unique_ids(&store);
}
