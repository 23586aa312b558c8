//! Debug logging support for ged
//!
//! Logging is off unless enabled through the config file or `--debug`.
//! When enabled, events are appended to ~/.ged/ged.log so stdout stays the
//! pure output stream.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

use crate::config::ged_dir;

/// Environment variable overriding the configured filter directive
pub const LOG_ENV: &str = "GED_LOG";

/// Initialize the debug logging system
///
/// If debug_enabled is true, sets up file logging filtered by `GED_LOG` or,
/// when that is unset, by `filter`. Returns the path to the log file, or
/// None if logging is not enabled.
pub fn init_debug_logging(debug_enabled: bool, filter: &str) -> Result<Option<PathBuf>> {
    if !debug_enabled {
        return Ok(None);
    }

    let log_path = log_file_path()?;

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()));

    // If we can't open the log file, fall back to no logging
    let log_file = match file {
        Ok(log_file) => log_file,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {:#}", e);
            return Ok(None);
        }
    };

    let subscriber = registry()
        .with(
            fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(build_filter(filter));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(Some(log_path))
}

/// `GED_LOG` wins over the configured directive; an invalid directive falls
/// back to the default one.
fn build_filter(filter: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }

    EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("Warning: Invalid log filter {:?}: {}", filter, e);
        EnvFilter::new(crate::config::DEFAULT_FILTER)
    })
}

/// Get the log file path (~/.ged/ged.log)
pub fn log_file_path() -> Result<PathBuf> {
    Ok(ged_dir()?.join("ged.log"))
}
