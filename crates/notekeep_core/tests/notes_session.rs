use notekeep_core::{
    AppPaths, LoadMode, NoteEdit, NoteTemplate, NotesSession, SessionConfig, SessionError,
    StorageError, Theme, WindowPosition,
};
use std::path::Path;
use std::time::Duration;

fn session_in(dir: &Path) -> NotesSession {
    NotesSession::new(SessionConfig::new(AppPaths::new(dir)))
}

fn titles(notes: &[notekeep_core::Note]) -> Vec<String> {
    notes.iter().map(|note| note.title().to_string()).collect()
}

#[test]
fn full_command_flow_keeps_views_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());

    let a = session.create_with_seed("Note1", "hello");
    let b = session.create_with_seed("Note2", "world");
    assert_eq!(titles(&session.list()), vec!["Note2", "Note1"]);

    session
        .update_note(a.id(), NoteEdit::content("hello there friend"))
        .unwrap();
    let stats = session.stats();
    assert_eq!(stats.total_notes, 2);
    assert_eq!(stats.total_words, 4);

    let summary = session.note_summary(a.id()).unwrap();
    assert_eq!(summary.word_count, 3);
    assert_eq!(summary.char_count, "hello there friend".len());

    session.delete_note(a.id()).unwrap();
    assert_eq!(titles(&session.search("world")), vec!["Note2"]);
    assert!(session.search("xyz").is_empty());
    assert_eq!(session.search("").len(), 1);
    assert_eq!(session.selected_id(), Some(b.id()));
}

#[test]
fn missing_ids_surface_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    session.create_note();

    for result in [
        session.delete_note(404).map(|_| ()),
        session.update_note(404, NoteEdit::title("x")).map(|_| ()),
        session.select(404).map(|_| ()),
        session.export_note(404, &dir.path().join("x.txt")),
    ] {
        assert!(matches!(result, Err(SessionError::NoteNotFound(404))));
    }
    assert_eq!(session.list().len(), 1);
}

#[test]
fn replace_load_drops_stale_selection_and_merge_appends() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("my_notes.json");

    let mut source = session_in(dir.path());
    source.create_with_seed("from file A", "");
    source.create_with_seed("from file B", "");
    source.save(&file).unwrap();

    let mut session = session_in(dir.path());
    let local = session.create_with_seed("local", "");
    for _ in 0..5 {
        session.create_note();
    }
    session.select(local.id()).unwrap();

    let merged = session.load(&file, LoadMode::Merge).unwrap();
    assert_eq!(merged.loaded, 2);
    assert_eq!(merged.total, 8);
    let list = session.list();
    assert_eq!(list[6].title(), "from file B");
    assert_eq!(list[7].title(), "from file A");
    assert_eq!(session.selected_id(), Some(local.id()));

    let replaced = session.load(&file, LoadMode::Replace).unwrap();
    assert_eq!(replaced.total, 2);
    assert_eq!(titles(&session.list()), vec!["from file B", "from file A"]);
    assert_eq!(session.selected_id(), None);

    let new_note = session.create_note();
    assert_eq!(
        session
            .list()
            .iter()
            .filter(|note| note.id() == new_note.id())
            .count(),
        1
    );
}

#[test]
fn failed_load_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "[oops").unwrap();

    let mut session = session_in(dir.path());
    session.create_with_seed("keep me", "");
    let before = session.list();

    let error = session.load(&bad, LoadMode::Replace).unwrap_err();
    assert!(matches!(
        error,
        SessionError::Storage(StorageError::Parse { .. })
    ));
    assert_eq!(session.list(), before);
}

#[test]
fn template_export_and_import_produce_ordinary_notes() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());

    let planned = session.create_from_template(NoteTemplate::MeetingNotes);
    assert_eq!(planned.title(), "Meeting notes");
    assert!(planned.content().contains("Agenda"));

    let export_path = dir.path().join("meeting.txt");
    session.export_note(planned.id(), &export_path).unwrap();
    let imported = session.import_note(&export_path).unwrap();

    assert_ne!(imported.id(), planned.id());
    assert_eq!(imported.title(), planned.title());
    assert_eq!(imported.content(), planned.content());
    assert_eq!(session.selected_id(), Some(imported.id()));
}

#[test]
fn open_restores_autosave_and_settings_and_shutdown_flushes() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig::new(AppPaths::new(dir.path()));

    let mut first = NotesSession::open(config.clone());
    assert!(first.list().is_empty());
    first.create_with_seed("persist me", "body");
    first.set_theme(Theme::Ocean);
    first.set_window_position(WindowPosition::new(300, 200));
    first.shutdown();

    let second = NotesSession::open(config);
    assert_eq!(titles(&second.list()), vec!["persist me"]);
    assert_eq!(second.settings().theme, Theme::Ocean);
    assert_eq!(second.settings().window_position, WindowPosition::new(300, 200));
}

#[test]
fn open_with_corrupt_autosave_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::new(dir.path());
    std::fs::write(paths.autosave_file(), "{ definitely not notes").unwrap();
    std::fs::write(paths.settings_file(), "garbage").unwrap();

    let session = NotesSession::open(SessionConfig::new(paths));
    assert!(session.list().is_empty());
    assert_eq!(session.settings().theme, Theme::Dark);
}

#[test]
fn background_autosave_runs_until_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig::new(AppPaths::new(dir.path()))
        .with_autosave_interval(Duration::from_millis(20));
    let autosave_file = config.paths.autosave_file();

    let mut session = NotesSession::new(config);
    session.create_with_seed("ticking", "");
    session.start_autosave().unwrap();
    session.start_autosave().unwrap();
    assert!(session.is_autosave_running());

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while !autosave_file.exists() && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(autosave_file.exists());

    session.stop_autosave();
    assert!(!session.is_autosave_running());
}

#[test]
fn read_only_commands_leave_damaged_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::new(dir.path());
    let damaged = r#"[{"id":1,"title":"важно","content":"keep me","#;
    std::fs::write(paths.autosave_file(), damaged).unwrap();
    std::fs::write(paths.settings_file(), "{\"theme\":").unwrap();

    let mut session = NotesSession::open(SessionConfig::new(paths.clone()));
    session.start_autosave().unwrap();
    assert_eq!(session.stats().total_notes, 0);
    assert!(session.search("важно").is_empty());
    assert!(session.select(1).is_err());
    session.set_window_position(WindowPosition::default());
    session.shutdown();

    assert_eq!(std::fs::read_to_string(paths.autosave_file()).unwrap(), damaged);
    assert_eq!(std::fs::read_to_string(paths.settings_file()).unwrap(), "{\"theme\":");
    let backup = dir.path().join("notes_data.json.bak");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), damaged);
}

#[test]
fn shutdown_flushes_only_after_a_change() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig::new(AppPaths::new(dir.path()));
    let autosave_file = config.paths.autosave_file();

    NotesSession::open(config.clone()).shutdown();
    assert!(!autosave_file.exists());

    let mut session = NotesSession::open(config);
    let note = session.create_note();
    session.delete_note(note.id()).unwrap();
    session.shutdown();
    assert_eq!(std::fs::read_to_string(&autosave_file).unwrap().trim(), "[]");
}

#[test]
fn select_random_picks_a_live_note_and_selects_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    assert!(matches!(session.select_random(), Err(SessionError::NoNotes)));

    let ids = (0..4)
        .map(|index| session.create_with_seed(format!("n{index}"), "").id())
        .collect::<Vec<_>>();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        let picked = session.select_random().unwrap();
        assert!(ids.contains(&picked.id()));
        assert_eq!(session.selected_id(), Some(picked.id()));
        seen.insert(picked.id());
    }
    assert!(seen.len() > 1, "random selection never varied");
}
