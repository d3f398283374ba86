//! Note search entry points.
//!
//! # Responsibility
//! - Expose the on-demand filter used by the notes list search box.
//! - Keep matching rules inside core so every UI filters identically.

pub mod filter;
