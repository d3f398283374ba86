//! Notes session: the command surface exposed to presentation layers.
//!
//! # Responsibility
//! - Wire the note store, selection, search, stats and persistence into the
//!   operations a UI invokes (create, edit, delete, select, search, save,
//!   load, export, stats).
//! - Own the autosave worker lifecycle and the shutdown flush.
//!
//! # Invariants
//! - Selection is an id re-resolved on every read; deleting the selected
//!   note or a replace-load clears it.
//! - Every operation applies fully or not at all: loads parse completely
//!   before the store is touched, explicit saves write a snapshot.
//! - Only this session mutates the store; the autosave worker reads
//!   snapshots.
//! - The autosave and settings files are rewritten only when their content
//!   changed in this session, so read-only use never touches them.

use crate::config::SessionConfig;
use crate::model::note::{now, Note, NoteId};
use crate::model::settings::{Settings, Theme, WindowPosition};
use crate::repo::note_store::{NoteEdit, NoteStore, StoreError};
use crate::search::filter::filter;
use crate::service::templates::NoteTemplate;
use crate::stats::{collection_stats, note_summary, CollectionStats, NoteSummary};
use crate::storage::{spawn_autosave, AutosaveHandle, PersistenceManager, StorageError};
use log::info;
use rand::seq::SliceRandom;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Title given to notes created from the "new note" action.
pub const DEFAULT_NOTE_TITLE: &str = "New note";

pub type SessionResult<T> = Result<T, SessionError>;

/// Error surfaced to the presentation layer for user-initiated commands.
#[derive(Debug)]
pub enum SessionError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// The command needs at least one note and the store is empty.
    NoNotes,
    /// Explicit save/load/export/import failed.
    Storage(StorageError),
    /// Autosave worker thread could not be started.
    AutosaveSpawn(std::io::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::NoNotes => write!(f, "no notes to choose from"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::AutosaveSpawn(err) => write!(f, "failed to start autosave worker: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoteNotFound(_) | Self::NoNotes => None,
            Self::Storage(err) => Some(err),
            Self::AutosaveSpawn(err) => Some(err),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NoteNotFound(id),
        }
    }
}

impl From<StorageError> for SessionError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// How a loaded collection is combined with the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Discard current notes and install the file verbatim.
    Replace,
    /// Append file notes after current ones with fresh ids.
    Merge,
}

/// Result envelope of a load command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub mode: LoadMode,
    /// Number of notes read from the file.
    pub loaded: usize,
    /// Store size after the load.
    pub total: usize,
}

/// One interactive notes session.
pub struct NotesSession {
    store: Arc<RwLock<NoteStore>>,
    persistence: Arc<PersistenceManager>,
    config: SessionConfig,
    settings: Settings,
    selected: Option<NoteId>,
    autosave: Option<AutosaveHandle>,
    /// Store revision the autosave file is known to hold.
    saved_revision: u64,
    settings_dirty: bool,
}

impl NotesSession {
    /// Creates an empty session without touching the file system.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(NoteStore::new())),
            persistence: Arc::new(PersistenceManager::new()),
            config,
            settings: Settings::default(),
            selected: None,
            autosave: None,
            saved_revision: 0,
            settings_dirty: false,
        }
    }

    /// Creates a session primed from the autosave file and settings file.
    ///
    /// Missing or corrupt files start an empty store / default settings.
    pub fn open(config: SessionConfig) -> Self {
        let mut session = Self::new(config);
        let paths = &session.config.paths;
        let notes = session.persistence.load_startup(&paths.autosave_file());
        session.settings = session.persistence.load_settings(&paths.settings_file());
        session.saved_revision = {
            let mut store = session.write_store();
            store.replace_all(notes);
            store.revision()
        };

        info!(
            "event=session_open module=session status=ok notes={} theme={}",
            session.read_store().len(),
            session.settings.theme
        );
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ---- notes ----

    /// Notes in store order (newest-created first).
    pub fn list(&self) -> Vec<Note> {
        self.read_store().snapshot()
    }

    pub fn find(&self, id: NoteId) -> SessionResult<Note> {
        Ok(self.read_store().find_by_id(id)?.clone())
    }

    /// Creates a blank note titled [`DEFAULT_NOTE_TITLE`] and selects it.
    pub fn create_note(&mut self) -> Note {
        self.create_with_seed(DEFAULT_NOTE_TITLE, "")
    }

    /// Creates a note from caller-provided seed text and selects it.
    pub fn create_with_seed(&mut self, title: impl Into<String>, content: impl Into<String>) -> Note {
        let note = self.write_store().create(title, content);
        self.selected = Some(note.id());
        note
    }

    pub fn create_from_template(&mut self, template: NoteTemplate) -> Note {
        self.create_with_seed(template.title(), template.render_content(now()))
    }

    pub fn update_note(&mut self, id: NoteId, edit: NoteEdit) -> SessionResult<Note> {
        Ok(self.write_store().update(id, edit)?)
    }

    pub fn clear_note(&mut self, id: NoteId) -> SessionResult<Note> {
        Ok(self.write_store().clear(id)?)
    }

    /// Deletes a note, clearing the selection when it pointed at that note.
    pub fn delete_note(&mut self, id: NoteId) -> SessionResult<Note> {
        let removed = self.write_store().delete(id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(removed)
    }

    // ---- selection ----

    pub fn select(&mut self, id: NoteId) -> SessionResult<Note> {
        let note = self.find(id)?;
        self.selected = Some(id);
        Ok(note)
    }

    /// Selects a uniformly random note.
    ///
    /// # Errors
    /// - `SessionError::NoNotes` when the store is empty.
    pub fn select_random(&mut self) -> SessionResult<Note> {
        let note = self
            .read_store()
            .list()
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(SessionError::NoNotes)?;
        self.selected = Some(note.id());
        Ok(note)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<NoteId> {
        self.selected
    }

    /// Re-resolves the selected id; `None` when nothing (live) is selected.
    pub fn selected(&self) -> Option<Note> {
        let id = self.selected?;
        self.read_store().find_by_id(id).ok().cloned()
    }

    // ---- derived views ----

    pub fn search(&self, query: &str) -> Vec<Note> {
        let store = self.read_store();
        filter(store.list(), query).into_iter().cloned().collect()
    }

    pub fn stats(&self) -> CollectionStats {
        collection_stats(self.read_store().list())
    }

    pub fn note_summary(&self, id: NoteId) -> SessionResult<NoteSummary> {
        Ok(note_summary(self.read_store().find_by_id(id)?))
    }

    // ---- persistence ----

    /// Saves a snapshot of every note to `path`.
    pub fn save(&self, path: &Path) -> SessionResult<()> {
        let notes = self.list();
        Ok(self.persistence.save_to(path, &notes)?)
    }

    /// Loads `path` and combines it with the store according to `mode`.
    ///
    /// The store is untouched when reading or parsing fails. A replace-load
    /// clears the selection since every prior note is gone.
    pub fn load(&mut self, path: &Path, mode: LoadMode) -> SessionResult<LoadOutcome> {
        let notes = self.persistence.load_from(path)?;
        let loaded = notes.len();

        let total = {
            let mut store = self.write_store();
            match mode {
                LoadMode::Replace => store.replace_all(notes),
                LoadMode::Merge => {
                    store.append_all(notes);
                }
            }
            store.len()
        };

        if mode == LoadMode::Replace {
            self.selected = None;
        }

        info!(
            "event=session_load module=session status=ok mode={:?} loaded={} total={}",
            mode, loaded, total
        );
        Ok(LoadOutcome {
            mode,
            loaded,
            total,
        })
    }

    pub fn export_note(&self, id: NoteId, path: &Path) -> SessionResult<()> {
        let note = self.find(id)?;
        Ok(self.persistence.export_note(path, &note)?)
    }

    /// Imports a text file as a new, selected note.
    pub fn import_note(&mut self, path: &Path) -> SessionResult<Note> {
        let imported = self.persistence.import_text_note(path)?;
        Ok(self.create_with_seed(imported.title, imported.content))
    }

    // ---- settings ----

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Switches theme and persists settings immediately (silently).
    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.save_settings();
    }

    /// Records the window offset; persisted on the next settings save.
    pub fn set_window_position(&mut self, position: WindowPosition) {
        if self.settings.window_position != position {
            self.settings.window_position = position;
            self.settings_dirty = true;
        }
    }

    pub fn save_settings(&mut self) {
        self.persistence
            .save_settings(&self.config.paths.settings_file(), &self.settings);
        self.settings_dirty = false;
    }

    // ---- autosave ----

    /// Starts the background autosave worker. Calling twice is a no-op.
    pub fn start_autosave(&mut self) -> SessionResult<()> {
        if self.autosave.is_some() {
            return Ok(());
        }

        let handle = spawn_autosave(
            Arc::clone(&self.persistence),
            self.config.paths.autosave_file(),
            self.config.autosave_interval,
            Arc::clone(&self.store),
            self.saved_revision,
        )
        .map_err(SessionError::AutosaveSpawn)?;
        self.autosave = Some(handle);
        Ok(())
    }

    pub fn stop_autosave(&mut self) {
        if let Some(handle) = self.autosave.take() {
            self.saved_revision = handle.stop();
        }
    }

    pub fn is_autosave_running(&self) -> bool {
        self.autosave.is_some()
    }

    /// Writes the autosave file now if the store changed since it was last
    /// written. Returns `false` only when a needed write failed.
    pub fn autosave_now(&mut self) -> bool {
        let (revision, notes) = {
            let store = self.read_store();
            if store.revision() == self.saved_revision {
                return true;
            }
            (store.revision(), store.snapshot())
        };
        let written = self
            .persistence
            .autosave_tick(&self.config.paths.autosave_file(), &notes);
        if written {
            self.saved_revision = revision;
        }
        written
    }

    /// Stops autosave, then flushes notes and settings one last time when
    /// either changed.
    pub fn shutdown(mut self) {
        self.stop_autosave();
        let flushed = self.autosave_now();
        if self.settings_dirty {
            self.save_settings();
        }
        info!(
            "event=session_shutdown module=session status=ok notes_flushed={}",
            flushed
        );
    }

    fn read_store(&self) -> RwLockReadGuard<'_, NoteStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, NoteStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}
