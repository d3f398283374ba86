//! UI preference model persisted next to the note collection.
//!
//! # Responsibility
//! - Define the small key-value settings record (theme, window position).
//! - Parse and render the `X+Y` window offset grammar.
//!
//! # Invariants
//! - Missing fields deserialize to their defaults.
//! - Unknown theme names and malformed offsets are rejected, never guessed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static WINDOW_POSITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+)\+(-?\d+)$").expect("valid window position regex"));

/// Error for settings values that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    UnknownTheme(String),
    InvalidWindowPosition(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTheme(value) => write!(
                f,
                "unknown theme `{value}`; expected dark|light|purple|ocean|forest"
            ),
            Self::InvalidWindowPosition(value) => {
                write!(f, "invalid window position `{value}`; expected `X+Y`")
            }
        }
    }
}

impl Error for SettingsError {}

/// Named color theme. Colors themselves belong to the presentation layer.
///
/// Parsing is case-insensitive for both [`FromStr`] and the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Purple,
    Ocean,
    Forest,
}

impl Theme {
    /// Every theme in presentation order.
    pub const ALL: [Theme; 5] = [
        Theme::Dark,
        Theme::Light,
        Theme::Purple,
        Theme::Ocean,
        Theme::Forest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Purple => "purple",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == normalized)
            .ok_or_else(|| SettingsError::UnknownTheme(value.to_string()))
    }
}

impl TryFrom<String> for Theme {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Theme> for String {
    fn from(value: Theme) -> Self {
        value.as_str().to_string()
    }
}

/// Window pixel offset, persisted as `"X+Y"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Display for WindowPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.x, self.y)
    }
}

impl FromStr for WindowPosition {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || SettingsError::InvalidWindowPosition(value.to_string());
        let caps = WINDOW_POSITION_RE.captures(value.trim()).ok_or_else(invalid)?;
        let x = caps[1].parse::<i32>().map_err(|_| invalid())?;
        let y = caps[2].parse::<i32>().map_err(|_| invalid())?;
        Ok(Self { x, y })
    }
}

impl TryFrom<String> for WindowPosition {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WindowPosition> for String {
    fn from(value: WindowPosition) -> Self {
        value.to_string()
    }
}

/// Persisted UI preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub window_position: WindowPosition,
}

#[cfg(test)]
mod tests {
    use super::{Settings, SettingsError, Theme, WindowPosition};

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Ocean".parse::<Theme>(), Ok(Theme::Ocean));
        assert_eq!(
            "neon".parse::<Theme>(),
            Err(SettingsError::UnknownTheme("neon".to_string()))
        );
    }

    #[test]
    fn window_position_accepts_negative_offsets() {
        assert_eq!(
            "-12+340".parse::<WindowPosition>(),
            Ok(WindowPosition::new(-12, 340))
        );
        assert_eq!(
            "10+-5".parse::<WindowPosition>(),
            Ok(WindowPosition::new(10, -5))
        );
        assert!("10x5".parse::<WindowPosition>().is_err());
        assert!("+".parse::<WindowPosition>().is_err());
    }

    #[test]
    fn settings_serialize_to_flat_strings() {
        let settings = Settings {
            theme: Theme::Forest,
            window_position: WindowPosition::new(260, 90),
        };
        let value = serde_json::to_value(settings).expect("settings should serialize");
        assert_eq!(value["theme"], "forest");
        assert_eq!(value["window_position"], "260+90");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"theme":"light"}"#).expect("partial settings should parse");
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.window_position, WindowPosition::default());
    }

    #[test]
    fn settings_file_theme_ignores_case() {
        let settings: Settings =
            serde_json::from_str(r#"{"theme":"Dark","window_position":"5+6"}"#)
                .expect("capitalized theme should parse");
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.window_position, WindowPosition::new(5, 6));
        assert!(serde_json::from_str::<Settings>(r#"{"theme":"neon"}"#).is_err());
    }
}
