//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the notes command surface to Dart via FRB.
//! - Hold the single process-wide notes session behind a mutex.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every command returns an envelope with `ok` + human-readable `message`.
//! - Commands other than `notes_open` fail softly until a session is open.

use log::warn;
use notekeep_core::{
    core_version as core_version_inner, format_timestamp, init_logging as init_logging_inner,
    note_summary, ping as ping_inner, AppPaths, LoadMode, Note, NoteEdit, NoteTemplate,
    NotesSession, SessionConfig, Theme, WindowPosition,
};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

static SESSION: Mutex<Option<NotesSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Note row shape for list and editor views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: u64,
    pub title: String,
    pub content: String,
    /// `YYYY-MM-DD HH:MM:SS`.
    pub created: String,
    /// `YYYY-MM-DD HH:MM:SS`.
    pub modified: String,
    pub word_count: u32,
    pub char_count: u32,
}

/// Envelope for commands that return one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    pub note: Option<NoteItem>,
    pub message: String,
}

/// Envelope for list/search commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    pub message: String,
}

/// Envelope for commands without a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Collection counters for the stats panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsResponse {
    pub ok: bool,
    pub total_notes: u32,
    pub total_words: u32,
    pub message: String,
}

/// Persisted UI preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsItem {
    pub theme: String,
    /// `X+Y` pixel offset.
    pub window_position: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }

    fn from_result(result: Result<String, String>) -> Self {
        match result {
            Ok(message) => Self::success(message),
            Err(message) => Self::failure(message),
        }
    }
}

impl NoteActionResponse {
    fn from_result(result: Result<(Note, &'static str), String>) -> Self {
        match result {
            Ok((note, message)) => Self {
                ok: true,
                note: Some(to_note_item(&note)),
                message: message.to_string(),
            },
            Err(message) => Self {
                ok: false,
                note: None,
                message,
            },
        }
    }
}

impl NotesListResponse {
    fn from_result(result: Result<Vec<Note>, String>) -> Self {
        match result {
            Ok(notes) => {
                let message = if notes.is_empty() {
                    "No notes.".to_string()
                } else {
                    format!("{} note(s).", notes.len())
                };
                Self {
                    ok: true,
                    items: notes.iter().map(to_note_item).collect(),
                    message,
                }
            }
            Err(message) => Self {
                ok: false,
                items: Vec::new(),
                message,
            },
        }
    }
}

/// Opens the process-wide session and starts autosave.
///
/// `data_dir` empty means `NOTEKEEP_DATA_DIR` or the working directory.
/// Calling again while a session is open is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_open(data_dir: String) -> ActionResponse {
    let mut guard = SESSION.lock().unwrap_or_else(PoisonError::into_inner);
    if guard.is_some() {
        return ActionResponse::success("Session already open.");
    }

    let paths = match data_dir.trim() {
        "" => match AppPaths::from_env() {
            Ok(paths) => paths,
            Err(err) => return ActionResponse::failure(format!("notes_open failed: {err}")),
        },
        dir => AppPaths::new(dir),
    };

    let mut session = NotesSession::open(SessionConfig::new(paths));
    if let Err(err) = session.start_autosave() {
        // Explicit saves still work; only the timer is missing.
        warn!("event=ffi_open module=ffi status=error error_code=autosave_spawn_failed error={err}");
    }
    let count = session.list().len();
    *guard = Some(session);
    ActionResponse::success(format!("Session open with {count} note(s)."))
}

/// Flushes autosave + settings and closes the session.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_shutdown() -> ActionResponse {
    let session = SESSION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    match session {
        Some(session) => {
            session.shutdown();
            ActionResponse::success("Session closed.")
        }
        None => ActionResponse::failure("notes_shutdown failed: session not open"),
    }
}

/// Creates a blank note and selects it.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_create() -> NoteActionResponse {
    NoteActionResponse::from_result(with_session(|session| {
        Ok((session.create_note(), "Note created."))
    }))
}

/// Creates a note from seed text and selects it.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_create_with_seed(title: String, content: String) -> NoteActionResponse {
    NoteActionResponse::from_result(with_session(|session| {
        Ok((session.create_with_seed(title, content), "Note created."))
    }))
}

/// Creates a note from a built-in template key
/// (`daily_plan|project_idea|meeting_notes`).
#[flutter_rust_bridge::frb(sync)]
pub fn notes_create_from_template(template: String) -> NoteActionResponse {
    let template = match template.parse::<NoteTemplate>() {
        Ok(template) => template,
        Err(err) => {
            return NoteActionResponse::from_result(Err(format!(
                "notes_create_from_template failed: {err}"
            )))
        }
    };
    NoteActionResponse::from_result(with_session(|session| {
        Ok((session.create_from_template(template), "Note created from template."))
    }))
}

/// Updates provided fields; `None` leaves a field untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_update(id: u64, title: Option<String>, content: Option<String>) -> NoteActionResponse {
    NoteActionResponse::from_result(with_session(|session| {
        session
            .update_note(id, NoteEdit { title, content })
            .map(|note| (note, "Note updated."))
            .map_err(|err| format!("notes_update failed: {err}"))
    }))
}

/// Empties title and content of a note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_clear(id: u64) -> NoteActionResponse {
    NoteActionResponse::from_result(with_session(|session| {
        session
            .clear_note(id)
            .map(|note| (note, "Note cleared."))
            .map_err(|err| format!("notes_clear failed: {err}"))
    }))
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete(id: u64) -> NoteActionResponse {
    NoteActionResponse::from_result(with_session(|session| {
        session
            .delete_note(id)
            .map(|note| (note, "Note deleted."))
            .map_err(|err| format!("notes_delete failed: {err}"))
    }))
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_select(id: u64) -> NoteActionResponse {
    NoteActionResponse::from_result(with_session(|session| {
        session
            .select(id)
            .map(|note| (note, "Note selected."))
            .map_err(|err| format!("notes_select failed: {err}"))
    }))
}

/// Selects a random note; fails when there are no notes.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_select_random() -> NoteActionResponse {
    NoteActionResponse::from_result(with_session(|session| {
        session
            .select_random()
            .map(|note| (note, "Random note selected."))
            .map_err(|err| format!("notes_select_random failed: {err}"))
    }))
}

/// Returns the selected note; `note` is `None` when nothing is selected.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_selected() -> NoteActionResponse {
    match with_session(|session| Ok(session.selected())) {
        Ok(Some(note)) => NoteActionResponse::from_result(Ok((note, "Selected note."))),
        Ok(None) => NoteActionResponse {
            ok: true,
            note: None,
            message: "No note selected.".to_string(),
        },
        Err(message) => NoteActionResponse::from_result(Err(message)),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NotesListResponse {
    NotesListResponse::from_result(with_session(|session| Ok(session.list())))
}

/// Case-insensitive substring search over title and content.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_search(query: String) -> NotesListResponse {
    NotesListResponse::from_result(with_session(|session| Ok(session.search(&query))))
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_stats() -> StatsResponse {
    match with_session(|session| Ok(session.stats())) {
        Ok(stats) => StatsResponse {
            ok: true,
            total_notes: saturating_u32(stats.total_notes),
            total_words: saturating_u32(stats.total_words),
            message: String::new(),
        },
        Err(message) => StatsResponse {
            ok: false,
            total_notes: 0,
            total_words: 0,
            message,
        },
    }
}

/// Saves every note to `path` as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_save(path: String) -> ActionResponse {
    ActionResponse::from_result(with_session(|session| {
        session
            .save(&PathBuf::from(&path))
            .map(|()| format!("Notes saved to {path}."))
            .map_err(|err| format!("notes_save failed: {err}"))
    }))
}

/// Loads notes from `path`, appending when `merge` is true.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_load(path: String, merge: bool) -> ActionResponse {
    let mode = if merge {
        LoadMode::Merge
    } else {
        LoadMode::Replace
    };
    ActionResponse::from_result(with_session(|session| {
        session
            .load(&PathBuf::from(&path), mode)
            .map(|outcome| {
                format!(
                    "Loaded {} note(s) from {path}; {} total.",
                    outcome.loaded, outcome.total
                )
            })
            .map_err(|err| format!("notes_load failed: {err}"))
    }))
}

/// Exports one note as plain text (`.txt` or `.md`).
#[flutter_rust_bridge::frb(sync)]
pub fn notes_export(id: u64, path: String) -> ActionResponse {
    ActionResponse::from_result(with_session(|session| {
        session
            .export_note(id, &PathBuf::from(&path))
            .map(|()| format!("Note exported to {path}."))
            .map_err(|err| format!("notes_export failed: {err}"))
    }))
}

/// Imports a text file as a new note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_import(path: String) -> NoteActionResponse {
    NoteActionResponse::from_result(with_session(|session| {
        session
            .import_note(&PathBuf::from(&path))
            .map(|note| (note, "Note imported."))
            .map_err(|err| format!("notes_import failed: {err}"))
    }))
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_get() -> Option<SettingsItem> {
    with_session(|session| Ok(session.settings()))
        .ok()
        .map(|settings| SettingsItem {
            theme: settings.theme.to_string(),
            window_position: settings.window_position.to_string(),
        })
}

/// Switches theme (`dark|light|purple|ocean|forest`) and persists it.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_theme(theme: String) -> ActionResponse {
    let theme = match theme.parse::<Theme>() {
        Ok(theme) => theme,
        Err(err) => return ActionResponse::failure(format!("settings_set_theme failed: {err}")),
    };
    ActionResponse::from_result(with_session(|session| {
        session.set_theme(theme);
        Ok(format!("Theme set to {theme}."))
    }))
}

/// Records the window offset (`X+Y`); saved with the next settings write.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_window_position(position: String) -> ActionResponse {
    let position = match position.parse::<WindowPosition>() {
        Ok(position) => position,
        Err(err) => {
            return ActionResponse::failure(format!("settings_set_window_position failed: {err}"))
        }
    };
    ActionResponse::from_result(with_session(|session| {
        session.set_window_position(position);
        Ok(format!("Window position set to {position}."))
    }))
}

fn with_session<T>(
    f: impl FnOnce(&mut NotesSession) -> Result<T, String>,
) -> Result<T, String> {
    let mut guard = SESSION.lock().unwrap_or_else(PoisonError::into_inner);
    match guard.as_mut() {
        Some(session) => f(session),
        None => Err("session not open; call notes_open first".to_string()),
    }
}

fn to_note_item(note: &Note) -> NoteItem {
    let summary = note_summary(note);
    NoteItem {
        id: note.id(),
        title: note.title().to_string(),
        content: note.content().to_string(),
        created: format_timestamp(&note.created()),
        modified: format_timestamp(&note.modified()),
        word_count: saturating_u32(summary.word_count),
        char_count: saturating_u32(summary.char_count),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
