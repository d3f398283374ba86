//! Note ownership layer.
//!
//! # Responsibility
//! - Hold the single in-memory note collection and its identity counter.
//! - Return semantic errors (`NotFound`) for id-addressed operations.
//!
//! # Invariants
//! - Only the interactive caller mutates the store; background work reads
//!   point-in-time snapshots.

pub mod note_store;
