//! Launch configuration for the pipegate TUI.
//!
//! Configuration is read once at startup from a small JSON file in the
//! standard configuration directory (`~/.config/pipegate/config.json` on most
//! platforms). Nothing is ever written back; the wizard keeps no state between
//! runs.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "PIPEGATE_CONFIG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

const DEFAULT_TICK_MILLIS: u64 = 100;
const DEFAULT_ACTIVITY_LOG_CAPACITY: usize = 200;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Values read from the config file. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Replaces the backend's fixed region list
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    /// YAML fixture served by the demo backend
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
    /// Busy spinner frame interval
    #[serde(default)]
    pub tick_millis: Option<u64>,
    /// Number of lines kept in the activity panel
    #[serde(default)]
    pub activity_log_capacity: Option<usize>,
}

impl AppConfig {
    /// Load from `PIPEGATE_CONFIG_PATH` or the default config location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Load from an explicit path. A missing file yields defaults; a malformed
    /// file is reported and ignored.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<AppConfig>(&data) {
                Ok(mut config) => {
                    config.fixture_path = config
                        .fixture_path
                        .map(|fixture| expand_tilde(&fixture.to_string_lossy()));
                    Ok(config)
                }
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse config file; using defaults"
                    );
                    Ok(AppConfig::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
            Err(error) => Err(ConfigError::Io(error)),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis.unwrap_or(DEFAULT_TICK_MILLIS).max(16))
    }

    pub fn activity_log_capacity(&self) -> usize {
        self.activity_log_capacity.unwrap_or(DEFAULT_ACTIVITY_LOG_CAPACITY).max(1)
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pipegate")
        .join(CONFIG_FILE_NAME)
}
