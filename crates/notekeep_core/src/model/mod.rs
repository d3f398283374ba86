//! Domain model for notes and UI preferences.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the serialized shape of every persisted record.
//!
//! # Invariants
//! - Every note is identified by a `NoteId` unique for the store lifetime.
//! - Core never stores presentation sentinels (placeholder text) as content.

pub mod note;
pub mod settings;
