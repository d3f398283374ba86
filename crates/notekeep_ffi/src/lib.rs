//! Flutter-facing bindings for NoteKeep core.
//!
//! Bridge code is generated from [`api`]; this crate only adapts core
//! results into FFI-safe envelopes.

pub mod api;
