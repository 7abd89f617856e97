//! Settings and configuration utilities.
//!
//! This module reads settings from $HOME/.smart-commit/settings.json. The
//! file can tune classification thresholds, pick a default color mode and
//! provide fallbacks for environment variables.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::{ColorMode, Composer, Thresholds};

/// Directory under $HOME holding the settings file.
pub const SETTINGS_DIR: &str = ".smart-commit";

/// Environment variable overriding the configured color mode.
pub const COLOR_ENV: &str = "SMART_COMMIT_COLOR";

/// Settings loaded from $HOME/.smart-commit/settings.json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Environment variable fallbacks.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Classification thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Default color mode for the display block.
    #[serde(default)]
    pub color: ColorMode,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings, logging a warning and using defaults on failure.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings: {e:#}");
            Self::default()
        })
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read settings file: {}", path.display()))
            }
        };

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(SETTINGS_DIR).join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        env::var(key).ok().or_else(|| self.env.get(key).cloned())
    }

    /// Resolves the color mode: the flag wins, then `SMART_COMMIT_COLOR`,
    /// then the configured default.
    pub fn color_mode(&self, flag: Option<ColorMode>) -> ColorMode {
        if let Some(mode) = flag {
            return mode;
        }
        match self.get_env_var(COLOR_ENV) {
            Some(value) => ColorMode::from_str(value.trim(), true).unwrap_or_else(|_| {
                warn!("Ignoring {COLOR_ENV}={value}; expected auto, always or never");
                self.color
            }),
            None => self.color,
        }
    }

    /// Builds a composer from the configured thresholds.
    pub fn composer(&self, flag: Option<ColorMode>) -> Composer {
        Composer::new(self.thresholds.clone(), self.color_mode(flag))
    }
}
