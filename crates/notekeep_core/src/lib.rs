//! Core domain logic for NoteKeep.
//! This crate is the single source of truth for note invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod stats;
pub mod storage;

pub use config::{AppPaths, ConfigError, SessionConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{format_timestamp, Note, NoteId, Timestamp, TIMESTAMP_FORMAT};
pub use model::settings::{Settings, SettingsError, Theme, WindowPosition};
pub use repo::note_store::{NoteEdit, NoteStore, StoreError, StoreResult};
pub use search::filter::filter;
pub use service::notes_session::{
    LoadMode, LoadOutcome, NotesSession, SessionError, SessionResult, DEFAULT_NOTE_TITLE,
};
pub use service::templates::NoteTemplate;
pub use stats::{
    char_count, collection_stats, note_summary, total_notes, total_words, word_count,
    CollectionStats, NoteSummary,
};
pub use storage::{PersistenceManager, StorageError, StorageResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
