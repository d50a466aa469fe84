//! tasklist configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::storage::DEFAULT_STORAGE_KEY;

/// Main tasklist configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where and how the list is persisted
    pub storage: StorageConfig,

    /// Front-end settings
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tasklist.yml
        let local_config = PathBuf::from(".tasklist.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tasklist/tasklist.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tasklist").join("tasklist.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Key-value backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per key under `path`
    #[default]
    File,
    /// SQLite database at `path/tasklist.db`
    Sqlite,
    /// Nothing persisted past the process
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,

    /// Store directory
    pub path: PathBuf,

    /// Key the list is stored under
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: default_data_dir(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Front-end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long add/update/delete notices stay visible
    #[serde(rename = "notice-duration-ms")]
    pub notice_duration_ms: u64,

    /// TUI input poll interval
    #[serde(rename = "tick-ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_duration_ms: 2000,
            tick_ms: 100,
        }
    }
}

impl UiConfig {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Base directory for data and logs: ~/.local/share/tasklist
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklist")
}
