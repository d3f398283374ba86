//! Runtime configuration for a notes session.
//!
//! # Responsibility
//! - Resolve the data directory and the well-known files inside it.
//! - Carry the autosave cadence.
//!
//! # Invariants
//! - The autosave target is never the same file as the settings file.
//! - An override pointing at an existing non-directory is rejected.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "NOTEKEEP_DATA_DIR";
/// Autosave target inside the data directory.
pub const AUTOSAVE_FILE_NAME: &str = "notes_data.json";
/// Settings file inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "app_settings.json";
/// Suggested file name for explicit saves.
pub const SUGGESTED_SAVE_FILE_NAME: &str = "my_notes.json";
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration error for data-directory resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NotADirectory(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotADirectory(path) => write!(
                f,
                "data directory `{}` exists and is not a directory",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Well-known file locations for one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolves the data directory from `NOTEKEEP_DATA_DIR`, else the
    /// working directory.
    ///
    /// # Errors
    /// - Returns an error when the override names an existing file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let override_dir = std::env::var(DATA_DIR_ENV).ok();
        Self::resolve(override_dir.as_deref())
    }

    fn resolve(override_dir: Option<&str>) -> Result<Self, ConfigError> {
        let Some(raw) = override_dir.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(Self::new("."));
        };

        let path = PathBuf::from(raw);
        if path.exists() && !path.is_dir() {
            return Err(ConfigError::NotADirectory(path));
        }
        Ok(Self::new(path))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn autosave_file(&self) -> PathBuf {
        self.data_dir.join(AUTOSAVE_FILE_NAME)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE_NAME)
    }

    pub fn suggested_save_file(&self) -> PathBuf {
        self.data_dir.join(SUGGESTED_SAVE_FILE_NAME)
    }
}

/// Session-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub paths: AppPaths,
    pub autosave_interval: Duration,
}

impl SessionConfig {
    pub fn new(paths: AppPaths) -> Self {
        Self {
            paths,
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
        }
    }

    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }
}
