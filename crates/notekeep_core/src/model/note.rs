//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record persisted and rendered by every view.
//! - Own the on-disk timestamp format (`YYYY-MM-DD HH:MM:SS`).
//!
//! # Invariants
//! - `id` is assigned by `NoteStore` and never reused while the store lives.
//! - `created` is set once; `modified >= created` always holds.
//! - Timestamps carry second precision so they survive a save/load cycle.

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

/// Stable identifier for a note within one store lifetime.
pub type NoteId = u64;

/// Local wall-clock timestamp with second precision.
pub type Timestamp = NaiveDateTime;

/// `strftime` pattern used by the note collection file and export headers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the current local time truncated to whole seconds.
pub fn now() -> Timestamp {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Formats a timestamp in the persisted `YYYY-MM-DD HH:MM:SS` shape.
pub fn format_timestamp(value: &Timestamp) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// User-authored title + content record.
///
/// Fields are private so that identity and timestamps can only change
/// through `NoteStore`; readers use the accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    title: String,
    content: String,
    #[serde(with = "timestamp_serde")]
    created: Timestamp,
    #[serde(with = "timestamp_serde")]
    modified: Timestamp,
}

impl Note {
    /// Creates a note stamped with the current time.
    pub fn new(id: NoteId, title: impl Into<String>, content: impl Into<String>) -> Self {
        let stamp = now();
        Self::with_timestamps(id, title, content, stamp, stamp)
    }

    /// Creates a note with caller-provided timestamps.
    ///
    /// Used by load/import paths where the timestamps already exist. A
    /// `modified` earlier than `created` is raised to `created`.
    pub fn with_timestamps(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        created: Timestamp,
        modified: Timestamp,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            created,
            modified: modified.max(created),
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn modified(&self) -> Timestamp {
        self.modified
    }

    pub(crate) fn assign_id(&mut self, id: NoteId) {
        self.id = id;
    }

    /// Applies an edit and stamps `modified`.
    ///
    /// A clock that went backwards stamps `created` instead, keeping
    /// `modified >= created`.
    pub(crate) fn apply_edit(&mut self, title: Option<String>, content: Option<String>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.modified = now().max(self.created);
    }

    pub(crate) fn normalize_timestamps(&mut self) {
        if self.modified < self.created {
            self.modified = self.created;
        }
    }
}

mod timestamp_serde {
    use super::{Timestamp, TIMESTAMP_FORMAT};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|err| {
            serde::de::Error::custom(format!("invalid timestamp `{raw}`: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, now, Note, Timestamp, TIMESTAMP_FORMAT};

    fn at(raw: &str) -> Timestamp {
        Timestamp::parse_from_str(raw, TIMESTAMP_FORMAT).expect("valid fixture timestamp")
    }

    #[test]
    fn now_has_no_subsecond_part() {
        let stamp = now();
        assert_eq!(stamp, at(&format_timestamp(&stamp)));
    }

    #[test]
    fn with_timestamps_clamps_modified_to_created() {
        let note = Note::with_timestamps(
            1,
            "t",
            "c",
            at("2024-05-02 10:00:00"),
            at("2024-05-01 10:00:00"),
        );
        assert_eq!(note.modified(), note.created());
    }

    #[test]
    fn serializes_to_persisted_field_shape() {
        let note = Note::with_timestamps(
            7,
            "Заметка",
            "body",
            at("2024-05-01 09:30:00"),
            at("2024-05-01 09:45:12"),
        );
        let value = serde_json::to_value(&note).expect("note should serialize");
        assert_eq!(value["id"], 7);
        assert_eq!(value["title"], "Заметка");
        assert_eq!(value["created"], "2024-05-01 09:30:00");
        assert_eq!(value["modified"], "2024-05-01 09:45:12");
    }

    #[test]
    fn rejects_malformed_timestamp() {
        let raw = r#"{"id":1,"title":"a","content":"b","created":"yesterday","modified":"2024-05-01 09:45:12"}"#;
        let error = serde_json::from_str::<Note>(raw).expect_err("bad timestamp must fail");
        assert!(error.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn apply_edit_stamps_modified_and_keeps_created() {
        let mut note = Note::with_timestamps(
            1,
            "old",
            "old body",
            at("2020-01-01 00:00:00"),
            at("2020-01-01 00:00:00"),
        );
        note.apply_edit(Some("new".to_string()), None);
        assert_eq!(note.title(), "new");
        assert_eq!(note.content(), "old body");
        assert_eq!(note.created(), at("2020-01-01 00:00:00"));
        assert!(note.modified() > note.created());
    }
}
