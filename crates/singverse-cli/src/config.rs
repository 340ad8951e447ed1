//! Reader configuration.
//!
//! Stored as JSON at `$SINGVERSE_CONFIG` or `<config_dir>/singverse/config.json`.
//! Every field is optional in the file; missing fields take their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use singverse_melody::{MelodySettings, PlaybackSettings};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SINGVERSE_CONFIG";

/// Where the raw KJV source is downloaded from.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/scrollmapper/bible_databases/master/formats/json/KJV.json";

/// Reader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Normalized `kjv.json` to read instead of the cached download.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
    /// Raw source URL used by `fetch`.
    pub source_url: String,
    pub melody: MelodySettings,
    pub playback: PlaybackSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            melody: MelodySettings::default(),
            playback: PlaybackSettings::default(),
        }
    }
}

impl Config {
    /// Resolves the config file location.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        dirs::config_dir().map(|d| d.join("singverse").join("config.json"))
    }

    /// Loads the config from its default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads and validates a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Checks melody and playback settings.
    pub fn validate(&self) -> Result<()> {
        self.melody.validate()?;
        self.playback.validate()?;
        Ok(())
    }
}
