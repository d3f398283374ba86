//! Plain-text export/import format for single notes.
//!
//! Layout:
//! ```text
//! # {title}
//!
//! Created: {created}
//! Modified: {modified}
//!
//! ---
//!
//! {content}
//! ```
//! The same bytes are written for `.txt` and `.md` targets.

use crate::model::note::{format_timestamp, Note};

const CREATED_LABEL: &str = "Created: ";
const MODIFIED_LABEL: &str = "Modified: ";
const SEPARATOR_BLOCK: &str = "\n---\n\n";

/// Title and body recovered from a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedNote {
    pub title: String,
    pub content: String,
}

/// Renders `note` in the export layout; content is appended verbatim.
pub fn render_export(note: &Note) -> String {
    format!(
        "# {}\n\n{CREATED_LABEL}{}\n{MODIFIED_LABEL}{}\n{SEPARATOR_BLOCK}{}",
        note.title(),
        format_timestamp(&note.created()),
        format_timestamp(&note.modified()),
        note.content()
    )
}

/// Recovers title and content from text produced by [`render_export`].
///
/// Returns `None` when the header block is missing or altered.
pub fn parse_export(text: &str) -> Option<ImportedNote> {
    let rest = text.strip_prefix("# ")?;
    let (title, rest) = rest.split_once("\n\n")?;
    if title.contains('\n') {
        return None;
    }

    let (created_line, rest) = rest.split_once('\n')?;
    created_line.strip_prefix(CREATED_LABEL)?;
    let (modified_line, rest) = rest.split_once('\n')?;
    modified_line.strip_prefix(MODIFIED_LABEL)?;
    let content = rest.strip_prefix(SEPARATOR_BLOCK)?;

    Some(ImportedNote {
        title: title.to_string(),
        content: content.to_string(),
    })
}
