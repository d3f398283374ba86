//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, search, stats and storage into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod notes_session;
pub mod templates;
