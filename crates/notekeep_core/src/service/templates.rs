//! Built-in note templates.
//!
//! Templates are seeds only: the created note is an ordinary note and keeps
//! no link back to its template.

use crate::model::note::Timestamp;
use std::str::FromStr;

/// Named starting point for a new note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteTemplate {
    DailyPlan,
    ProjectIdea,
    MeetingNotes,
}

impl NoteTemplate {
    pub const ALL: [NoteTemplate; 3] = [
        NoteTemplate::DailyPlan,
        NoteTemplate::ProjectIdea,
        NoteTemplate::MeetingNotes,
    ];

    /// Stable key used by CLI/FFI callers.
    pub fn key(self) -> &'static str {
        match self {
            Self::DailyPlan => "daily_plan",
            Self::ProjectIdea => "project_idea",
            Self::MeetingNotes => "meeting_notes",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::DailyPlan => "Daily plan",
            Self::ProjectIdea => "Project idea",
            Self::MeetingNotes => "Meeting notes",
        }
    }

    /// Renders the template body with dates taken from `now`.
    pub fn render_content(self, now: Timestamp) -> String {
        match self {
            Self::DailyPlan => format!(
                "📅 Date: {}\n\n🎯 Goals for today:\n• \n• \n• \n\n📝 Key tasks:\n1. \n2. \n3. \n\n💭 Notes:\n\n✅ Done:\n",
                now.format("%d.%m.%Y")
            ),
            Self::ProjectIdea => "💡 Project name: \n\n📋 Description:\n\n🎯 Goal:\n\n🛠️ Technologies:\n• \n• \n\n📋 Tasks:\n1. \n2. \n3. \n\n📅 Deadlines:\n\n💰 Budget:\n\n📝 Extra notes:\n".to_string(),
            Self::MeetingNotes => format!(
                "🤝 Meeting: \n📅 Date: {}\n👥 Attendees: \n\n📋 Agenda:\n1. \n2. \n3. \n\n💬 Discussion:\n\n✅ Decisions:\n\n📝 Next steps:\n\n📅 Next meeting:\n",
                now.format("%d.%m.%Y %H:%M")
            ),
        }
    }
}

impl FromStr for NoteTemplate {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        NoteTemplate::ALL
            .into_iter()
            .find(|template| template.key() == normalized)
            .ok_or_else(|| {
                format!("unknown template `{value}`; expected daily_plan|project_idea|meeting_notes")
            })
    }
}
