//! Background autosave worker.
//!
//! # Responsibility
//! - Write a snapshot of the note collection to the autosave target on a
//!   fixed period, independent of user activity.
//!
//! # Invariants
//! - The worker only reads notes, through [`SnapshotSource::changed_since`],
//!   and never holds a store lock while writing.
//! - A tick whose store revision matches the last written one writes nothing,
//!   so an untouched collection never overwrites the target.
//! - Failures are logged and swallowed; the next tick is the retry.
//! - Stopping never interrupts an in-flight write.

use super::PersistenceManager;
use crate::model::note::Note;
use crate::repo::note_store::NoteStore;
use log::{info, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Produces point-in-time copies of the note collection.
pub trait SnapshotSource: Send + 'static {
    /// Returns the current revision and a snapshot, or `None` when the
    /// collection is still at `revision`.
    fn changed_since(&self, revision: u64) -> Option<(u64, Vec<Note>)>;
}

impl SnapshotSource for Arc<RwLock<NoteStore>> {
    fn changed_since(&self, revision: u64) -> Option<(u64, Vec<Note>)> {
        let store = self.read().unwrap_or_else(PoisonError::into_inner);
        if store.revision() == revision {
            return None;
        }
        Some((store.revision(), store.snapshot()))
    }
}

/// Owner handle for a running autosave worker.
///
/// Dropping the handle stops the worker and waits for it to exit.
#[derive(Debug)]
pub struct AutosaveHandle {
    target: PathBuf,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<u64>>,
    saved_revision: u64,
}

impl AutosaveHandle {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Signals the worker and waits until it has exited.
    ///
    /// Returns the store revision last written to the target.
    pub fn stop(mut self) -> u64 {
        self.shutdown();
        self.saved_revision
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            match worker.join() {
                Ok(revision) => self.saved_revision = revision,
                Err(_) => warn!(
                    "event=autosave_stop module=autosave status=error error_code=worker_panicked"
                ),
            }
        }
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawns the autosave worker thread.
///
/// Every `interval` the worker takes a snapshot from `source` and writes it
/// to `target` through `manager`, sharing the manager's per-path lock with
/// explicit saves. `saved_revision` is the store revision the target already
/// holds; ticks are skipped until the store moves past it.
///
/// # Errors
/// - Returns an error when the OS refuses to spawn the thread.
pub fn spawn_autosave<S: SnapshotSource>(
    manager: Arc<PersistenceManager>,
    target: PathBuf,
    interval: Duration,
    source: S,
    saved_revision: u64,
) -> io::Result<AutosaveHandle> {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let worker_target = target.clone();

    let worker = thread::Builder::new()
        .name("notekeep-autosave".to_string())
        .spawn(move || {
            info!(
                "event=autosave_start module=autosave status=ok interval_ms={}",
                interval.as_millis()
            );
            let mut saved = saved_revision;
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let Some((revision, notes)) = source.changed_since(saved) else {
                            continue;
                        };
                        if manager.autosave_tick(&worker_target, &notes) {
                            saved = revision;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("event=autosave_stop module=autosave status=ok");
            saved
        })?;

    Ok(AutosaveHandle {
        target,
        stop_tx: Some(stop_tx),
        worker: Some(worker),
        saved_revision,
    })
}
