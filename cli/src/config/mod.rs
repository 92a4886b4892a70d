//! Configuration management for gitdock.

pub mod paths;
pub mod settings;
pub mod state;

pub use paths::config_file;
pub use settings::GitdockConfig;
#[allow(unused_imports)]
pub use state::ClientState;

use std::path::Path;

use crate::error::{GitdockError, Result};

/// Load configuration from the default config file.
///
/// If the config file doesn't exist, returns default configuration.
pub fn load_config() -> Result<GitdockConfig> {
    let path = config_file()?;
    load_config_from(&path)
}

/// Load configuration from a specific path.
///
/// If the file doesn't exist, returns default configuration.
pub fn load_config_from(path: &Path) -> Result<GitdockConfig> {
    if !path.exists() {
        return Ok(GitdockConfig::default().with_env_overrides());
    }

    let contents = std::fs::read_to_string(path)?;
    let config: GitdockConfig =
        toml::from_str(&contents).map_err(|e| GitdockError::ConfigRead(e.to_string()))?;

    Ok(config.with_env_overrides())
}

/// Save configuration to the default config file.
#[allow(dead_code)]
pub fn save_config(config: &GitdockConfig) -> Result<()> {
    let path = config_file()?;
    save_config_to(config, &path)
}

/// Save configuration to a specific path.
#[allow(dead_code)]
pub fn save_config_to(config: &GitdockConfig, path: &Path) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| GitdockError::ConfigWrite(e.to_string()))?;
    std::fs::write(path, contents)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp.path().join("missing.toml")).unwrap();
        assert_eq!(config.git.remote, "origin");
        assert!(config.git.auto_stash);
        assert!(config.git.behind_check);
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        let mut config = GitdockConfig::default();
        config.git.remote = "upstream".to_string();
        config.git.behind_check = false;
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.git.remote, "upstream");
        assert!(!loaded.git.behind_check);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(GitdockError::ConfigRead(_))));
    }
}
