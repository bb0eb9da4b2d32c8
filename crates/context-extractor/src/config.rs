//! The `cursorContextSave` settings section.
//!
//! Settings are layered, later sources win:
//! 1. Built-in defaults
//! 2. Environment variables (`CURSOR_CONTEXT_SAVE_FILE`, `CURSOR_CONTEXT_SAVE_LINES`)
//! 3. Whatever the editor sends (initialization options, configuration changes)
//!
//! Editor updates may be partial; fields they leave out keep their value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// Settings section name as editors namespace it.
pub const CONFIG_SECTION: &str = "cursorContextSave";

pub const DEFAULT_FILE_PATH: &str = "cursor-context.txt";
pub const DEFAULT_CONTEXT_LINES: u32 = 5;

pub const FILE_PATH_ENV: &str = "CURSOR_CONTEXT_SAVE_FILE";
pub const CONTEXT_LINES_ENV: &str = "CURSOR_CONTEXT_SAVE_LINES";

/// Where to save, and how much context to take around the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfig {
    /// Target file. Relative paths are resolved against the workspace root.
    pub file_path: String,
    /// Lines above and below the cursor line when nothing is selected.
    pub context_lines: u32,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            file_path: DEFAULT_FILE_PATH.to_string(),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

impl SaveConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(FILE_PATH_ENV) {
            if !path.trim().is_empty() {
                tracing::info!("Using {} from environment: {}", FILE_PATH_ENV, path);
                self.file_path = path;
            }
        }

        if let Some(lines) = lookup(CONTEXT_LINES_ENV) {
            match lines.trim().parse::<u32>() {
                Ok(n) => {
                    tracing::info!("Using {} from environment: {}", CONTEXT_LINES_ENV, n);
                    self.context_lines = n;
                }
                Err(e) => {
                    tracing::warn!("Ignoring {}={:?}: {}", CONTEXT_LINES_ENV, lines, e);
                }
            }
        }

        self
    }

    /// Apply a partial update. Returns true if anything changed.
    pub fn apply(&mut self, update: SaveConfigUpdate) -> bool {
        let before = self.clone();

        if let Some(path) = update.file_path {
            self.file_path = path;
        }
        if let Some(lines) = update.context_lines {
            self.context_lines = lines;
        }

        *self != before
    }

    /// Parse `settings` as sent by an editor and apply them.
    ///
    /// On error nothing is changed.
    pub fn apply_settings(&mut self, settings: &Value) -> Result<bool, ConfigError> {
        let update = SaveConfigUpdate::from_settings(settings)?;
        Ok(self.apply(update))
    }
}

/// A partial settings update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfigUpdate {
    pub file_path: Option<String>,
    pub context_lines: Option<u32>,
}

impl SaveConfigUpdate {
    /// Read an update from editor settings.
    ///
    /// Accepts both `{"cursorContextSave": {...}}` and the bare section
    /// object. `null` is an empty update.
    pub fn from_settings(settings: &Value) -> Result<Self, ConfigError> {
        let section = settings.get(CONFIG_SECTION).unwrap_or(settings);
        if section.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(section.clone())?)
    }
}
