//! JSON file persistence with per-path write serialization.
//!
//! # Responsibility
//! - Encode/decode the note collection file.
//! - Write every target through a temp file + rename under a per-path lock.
//! - Apply the silent policy for startup load, autosave and settings.
//!
//! # Invariants
//! - Two writes to the same path run sequentially.
//! - A lock is held only for the write itself, never while encoding.
//! - A path's lock entry lives only while some writer holds it.
//! - A startup file that fails to load is copied aside before anything can
//!   overwrite it.

use super::export::{parse_export, render_export, ImportedNote};
use super::{StorageError, StorageResult};
use crate::model::note::Note;
use crate::model::settings::Settings;
use log::{error, info, warn};
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Serializes note collections, exports and settings to local files.
///
/// Shared between the interactive caller and the autosave worker behind an
/// `Arc`; each target path gets its own write lock.
#[derive(Debug, Default)]
pub struct PersistenceManager {
    path_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PersistenceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `notes` to `path` as a pretty-printed JSON array in store order.
    ///
    /// # Errors
    /// - `StorageError::Io` when the file cannot be written. No retry.
    pub fn save_to(&self, path: &Path, notes: &[Note]) -> StorageResult<()> {
        let started_at = Instant::now();
        let payload = serde_json::to_vec_pretty(notes).map_err(|err| StorageError::Io {
            path: path.to_path_buf(),
            source: io::Error::from(err),
        })?;

        match self.write_locked(path, &payload) {
            Ok(()) => {
                info!(
                    "event=notes_save module=storage status=ok notes={} bytes={} duration_ms={}",
                    notes.len(),
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=notes_save module=storage status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Reads and parses a note collection file.
    ///
    /// # Errors
    /// - `StorageError::Io` when the file cannot be read.
    /// - `StorageError::Parse` when the content is not a valid note array.
    pub fn load_from(&self, path: &Path) -> StorageResult<Vec<Note>> {
        let started_at = Instant::now();
        let result = read_notes(path);
        match &result {
            Ok(notes) => info!(
                "event=notes_load module=storage status=ok notes={} duration_ms={}",
                notes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=notes_load module=storage status=error duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }

    /// Loads the collection used at startup.
    ///
    /// A missing file means a first run; an unreadable or malformed file is
    /// treated as no prior data after a copy is kept next to it as
    /// `<file>.bak`. Neither case is an error for the caller.
    pub fn load_startup(&self, path: &Path) -> Vec<Note> {
        if !path.exists() {
            info!(
                "event=startup_load module=storage status=ok notes=0 reason=missing_file path={}",
                path.display()
            );
            return Vec::new();
        }

        match read_notes(path) {
            Ok(notes) => {
                info!(
                    "event=startup_load module=storage status=ok notes={}",
                    notes.len()
                );
                notes
            }
            Err(err) => {
                warn!(
                    "event=startup_load module=storage status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.keep_backup(path);
                Vec::new()
            }
        }
    }

    /// Best-effort write of an autosave snapshot.
    ///
    /// Failures are logged and swallowed; the next tick tries again.
    /// Returns whether the write succeeded.
    pub fn autosave_tick(&self, path: &Path, notes: &[Note]) -> bool {
        let started_at = Instant::now();
        let payload = match serde_json::to_vec_pretty(notes) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=autosave module=storage status=error error_code=encode_failed error={err}");
                return false;
            }
        };

        match self.write_locked(path, &payload) {
            Ok(()) => {
                info!(
                    "event=autosave module=storage status=ok notes={} duration_ms={}",
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                true
            }
            Err(err) => {
                warn!(
                    "event=autosave module=storage status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                false
            }
        }
    }

    /// Writes one note as a plain-text document with a header block.
    ///
    /// # Errors
    /// - `StorageError::Io` when the file cannot be written.
    pub fn export_note(&self, path: &Path, note: &Note) -> StorageResult<()> {
        let rendered = render_export(note);
        match self.write_locked(path, rendered.as_bytes()) {
            Ok(()) => {
                info!(
                    "event=note_export module=storage status=ok note_id={} bytes={}",
                    note.id(),
                    rendered.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=note_export module=storage status=error note_id={} error_code={} error={}",
                    note.id(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Reads a `.txt`/`.md` file as a new note.
    ///
    /// Files produced by [`PersistenceManager::export_note`] give back their
    /// title and body; any other file is titled by its file stem.
    ///
    /// # Errors
    /// - `StorageError::Io` when the file cannot be read as UTF-8 text.
    pub fn import_text_note(&self, path: &Path) -> StorageResult<ImportedNote> {
        let text = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let imported = parse_export(&text).unwrap_or_else(|| ImportedNote {
            title: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            content: text,
        });
        info!(
            "event=note_import module=storage status=ok chars={}",
            imported.content.chars().count()
        );
        Ok(imported)
    }

    /// Loads UI settings, falling back to defaults on absence or corruption.
    pub fn load_settings(&self, path: &Path) -> Settings {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Settings::default(),
            Err(err) => {
                warn!("event=settings_load module=storage status=error error_code=io_error error={err}");
                return Settings::default();
            }
        };

        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("event=settings_load module=storage status=error error_code=parse_error error={err}");
                Settings::default()
            }
        }
    }

    /// Saves UI settings. Failures are logged only.
    pub fn save_settings(&self, path: &Path, settings: &Settings) {
        let payload = match serde_json::to_vec_pretty(settings) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=settings_save module=storage status=error error_code=encode_failed error={err}");
                return;
            }
        };

        if let Err(err) = self.write_locked(path, &payload) {
            warn!(
                "event=settings_save module=storage status=error error_code={} error={}",
                err.code(),
                err
            );
        }
    }

    fn keep_backup(&self, path: &Path) {
        let backup = backup_path(path);
        let lock = self.path_lock(&backup);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            std::fs::copy(path, &backup)
        };
        self.release_path_lock(&backup, lock);

        match result {
            Ok(bytes) => warn!(
                "event=startup_backup module=storage status=ok bytes={} backup={}",
                bytes,
                backup.display()
            ),
            Err(err) => error!(
                "event=startup_backup module=storage status=error error_code=io_error error={err}"
            ),
        }
    }

    fn write_locked(&self, path: &Path, bytes: &[u8]) -> StorageResult<()> {
        let lock = self.path_lock(path);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            write_atomic(path, bytes)
        };
        self.release_path_lock(path, lock);
        result.map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn path_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self
            .path_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(lock_key(path)).or_default())
    }

    /// Drops `lock` and removes its registry entry when no other writer
    /// holds or waits on it.
    fn release_path_lock(&self, path: &Path, lock: Arc<Mutex<()>>) {
        let mut locks = self
            .path_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Registry entry plus `lock` itself.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&lock_key(path));
        }
    }
}

fn lock_key(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("notes"));
    name.push(".bak");
    path.with_file_name(name)
}

fn read_notes(path: &Path) -> StorageResult<Vec<Note>> {
    let raw = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
