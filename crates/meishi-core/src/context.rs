//! Application context
//!
//! User preferences (color theme and language) are loaded once when the
//! application starts and written back whenever one of them changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// Color theme shared by the app shell and individual cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Blue,
    Pink,
}

impl ColorTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Pink => "pink",
        }
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorTheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "pink" => Ok(Self::Pink),
            other => Err(Error::ValidationFailed(format!("unknown color theme: {}", other))),
        }
    }
}

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ColorTheme,

    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: ColorTheme::default(),
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    "ko".to_string()
}

/// Explicit application context handed to each screen
#[derive(Debug, Clone)]
pub struct AppContext {
    path: PathBuf,
    preferences: Preferences,
}

impl AppContext {
    /// Load preferences from `path`, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let preferences = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(prefs) => prefs,
                Err(e) => {
                    warn!("Ignoring malformed preferences at {}: {}", path.display(), e);
                    Preferences::default()
                }
            },
            Err(_) => {
                debug!("No preferences at {}, using defaults", path.display());
                Preferences::default()
            }
        };

        Self { path, preferences }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn theme(&self) -> ColorTheme {
        self.preferences.theme
    }

    pub fn language(&self) -> &str {
        &self.preferences.language
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Change the theme and persist immediately
    pub fn set_theme(&mut self, theme: ColorTheme) -> Result<()> {
        let updated = Preferences {
            theme,
            ..self.preferences.clone()
        };
        self.save(&updated)?;
        self.preferences = updated;
        info!("Theme changed to {}", theme);
        Ok(())
    }

    /// Change the language and persist immediately
    pub fn set_language(&mut self, language: impl Into<String>) -> Result<()> {
        let language = language.into();
        if language.trim().is_empty() {
            return Err(Error::ValidationFailed("language must not be empty".to_string()));
        }
        let updated = Preferences {
            language,
            ..self.preferences.clone()
        };
        self.save(&updated)?;
        self.preferences = updated;
        info!("Language changed to {}", self.preferences.language);
        Ok(())
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(preferences)
            .map_err(|e| Error::Config(format!("Failed to serialize preferences: {}", e)))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
