//! Durable storage for notes and preferences.
//!
//! # Responsibility
//! - Save/load the note collection as JSON and export single notes as text.
//! - Persist UI settings with a silent-failure policy.
//! - Run the periodic best-effort autosave worker.
//!
//! # Invariants
//! - Writes to one target path never interleave; different paths never wait
//!   on each other.
//! - A failed load never touches the in-memory store.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod autosave;
mod export;
mod manager;

pub use autosave::{spawn_autosave, AutosaveHandle, SnapshotSource};
pub use export::{parse_export, render_export, ImportedNote};
pub use manager::PersistenceManager;

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error for explicit save/load/export calls.
#[derive(Debug)]
pub enum StorageError {
    /// File-system operation failed (permission, missing path, disk full).
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File content is malformed JSON or misses required fields.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => path,
        }
    }

    /// Stable short code used in log lines and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_error",
            Self::Parse { .. } => "parse_error",
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "i/o failure on `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "malformed note data in `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}
