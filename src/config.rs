/// Configuration management for ged
///
/// ged reads optional configuration from ~/.ged/config.toml. A missing file
/// means defaults; ged never writes the file itself.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// ged configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Debug logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Processing settings
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write a debug log to ~/.ged/ged.log
    #[serde(default = "default_debug")]
    pub debug: Option<bool>,

    /// tracing filter directive, e.g. "ged=trace"
    #[serde(default = "default_filter")]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug: Some(false),
            filter: Some(DEFAULT_FILTER.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Stream line-only programs instead of buffering the input
    #[serde(default = "default_streaming")]
    pub streaming: Option<bool>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { streaming: Some(true) }
    }
}

pub const DEFAULT_FILTER: &str = "ged=debug";

// Default functions for serde
fn default_debug() -> Option<bool> { Some(false) }
fn default_filter() -> Option<String> { Some(DEFAULT_FILTER.to_string()) }
fn default_streaming() -> Option<bool> { Some(true) }

impl Config {
    pub fn debug_enabled(&self) -> bool {
        self.logging.debug.unwrap_or(false)
    }

    pub fn log_filter(&self) -> &str {
        self.logging.filter.as_deref().unwrap_or(DEFAULT_FILTER)
    }

    pub fn streaming_enabled(&self) -> bool {
        self.processing.streaming.unwrap_or(true)
    }
}

/// Get the ged data directory (~/.ged)
pub fn ged_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home_dir.join(".ged"))
}

/// Get the configuration file path
pub fn config_file_path() -> Result<PathBuf> {
    Ok(ged_dir()?.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns defaults if the file does not exist.
pub fn load_config() -> Result<Config> {
    let config_path = config_file_path()?;

    if !config_path.exists() {
        return Ok(Config::default());
    }

    load_config_from(&config_path)
}

/// Load configuration from a specific file
pub fn load_config_from(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    validate_config(&config)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(config)
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(filter) = &config.logging.filter {
        if filter.trim().is_empty() {
            anyhow::bail!("Invalid logging filter: must not be empty");
        }
    }

    Ok(())
}
