//! Configuration management for pgbrowse.
//!
//! Handles loading the optional TOML config file that pre-fills the connect
//! dialog and tunes the result display. Passwords are never read from it.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default width, in terminal cells, of every result column.
pub const DEFAULT_COLUMN_WIDTH: u16 = 14;

/// Narrowest column the result table will draw.
pub const MIN_COLUMN_WIDTH: u16 = 4;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Values pre-filled into the connect dialog.
    #[serde(default)]
    pub defaults: FormDefaults,

    /// Result display settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Pre-filled connect dialog values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FormDefaults {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub user: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: String::new(),
        }
    }
}

/// Result table settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Fixed width of each result column.
    #[serde(default = "default_column_width")]
    pub column_width: u16,
}

fn default_column_width() -> u16 {
    DEFAULT_COLUMN_WIDTH
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            column_width: default_column_width(),
        }
    }
}

impl DisplayConfig {
    /// Returns the column width, never narrower than [`MIN_COLUMN_WIDTH`].
    pub fn effective_column_width(&self) -> u16 {
        self.column_width.max(MIN_COLUMN_WIDTH)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pgbrowse")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file; a missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AppError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
