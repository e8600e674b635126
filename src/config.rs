//! Configuration management for FlixTUI
//!
//! Handles config file loading/saving and API key resolution.
//! Config is stored at ~/.config/flixtui/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the TMDB key or read token
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No TMDB API key: set TMDB_API_KEY or tmdb_api_key in the config file")]
    MissingApiKey,

    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB v3 API key or v4 read token
    pub tmdb_api_key: Option<String>,
    /// Where the watch list and selected profile are stored
    pub data_dir: Option<PathBuf>,
    /// Days a release counts as "recently added"
    pub recency_days: u32,
    /// How long toasts stay visible
    pub toast_duration_ms: u64,
    /// Quiet period after the last search keystroke
    pub search_debounce_ms: u64,
    /// Log file for TUI mode
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            data_dir: None,
            recency_days: 30,
            toast_duration_ms: 3000,
            search_debounce_ms: 300,
            log_file: None,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/flixtui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flixtui").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Get TMDB API key: environment variable first, then the config file
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    /// Resolve the key given an explicit environment value
    pub fn api_key_with(&self, env_value: Option<String>) -> Result<String, ConfigError> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.tmdb_api_key
                    .clone()
                    .filter(|k| !k.trim().is_empty())
            })
            .map(|k| k.trim().to_string())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Storage directory (~/.local/share/flixtui unless overridden)
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("flixtui")
        })
    }

    /// Log file used while the TUI owns the terminal
    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join("flixtui.log"))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
