//! Platform-specific path utilities for gitdock.

use std::path::PathBuf;

use crate::error::{GitdockError, Result};

/// Get the configuration directory for gitdock.
///
/// - Linux: `~/.config/gitdock`
/// - macOS: `~/Library/Application Support/gitdock`
/// - Windows: `%APPDATA%\gitdock`
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| GitdockError::Config("Cannot determine config directory".to_string()))?;
    Ok(base.join("gitdock"))
}

/// Get the data directory for gitdock.
///
/// - Linux: `~/.local/share/gitdock`
/// - macOS: `~/Library/Application Support/gitdock`
/// - Windows: `%APPDATA%\gitdock`
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| GitdockError::Config("Cannot determine data directory".to_string()))?;
    Ok(base.join("gitdock"))
}

/// Get the main configuration file path.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the client state file path.
pub fn state_file() -> Result<PathBuf> {
    Ok(data_dir()?.join("state.json"))
}

/// Ensure the data directory exists.
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = data_dir()?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}
