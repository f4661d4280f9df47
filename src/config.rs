//! Configuration management for the SQL playground.
//!
//! Loads settings from a TOML file. Every field has a default, so a missing
//! file or a partial file is valid.

use crate::error::{PlaygroundError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query execution settings.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Where persisted state lives.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Query execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Simulated latency before a result becomes visible, in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Rows per result page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Number of recent queries kept in the history panel.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_latency_ms() -> u64 {
    500
}

fn default_page_size() -> usize {
    10
}

fn default_history_limit() -> usize {
    10
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            page_size: default_page_size(),
            history_limit: default_history_limit(),
        }
    }
}

impl ExecutionConfig {
    /// Returns the simulated latency as a duration.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Persisted state location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// State file path. Defaults to the platform state directory.
    pub state_file: Option<PathBuf>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sql-playground")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| PlaygroundError::config(format!("Failed to read config file: {e}")))?;

        let config = Self::parse_toml(&content, path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            PlaygroundError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.execution.page_size == 0 {
            return Err(PlaygroundError::config(
                "execution.page_size must be greater than zero",
            ));
        }
        if self.execution.history_limit == 0 {
            return Err(PlaygroundError::config(
                "execution.history_limit must be greater than zero",
            ));
        }
        Ok(())
    }
}
