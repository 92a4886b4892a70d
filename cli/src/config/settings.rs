//! Application configuration settings.

use serde::{Deserialize, Serialize};

/// Main configuration for gitdock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitdockConfig {
    /// Git behavior settings.
    pub git: GitSettings,
}

/// Git behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    /// Remote name operations target.
    pub remote: String,

    /// Automatically stash and restore uncommitted changes around pulls.
    pub auto_stash: bool,

    /// Check whether the remote moved ahead before committing.
    pub behind_check: bool,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            auto_stash: true,
            behind_check: true,
        }
    }
}

/// Environment variables that can override configuration.
#[allow(dead_code)]
pub mod env {
    pub const REMOTE: &str = "GITDOCK_REMOTE";
    pub const LOG_LEVEL: &str = "GITDOCK_LOG";
}

impl GitdockConfig {
    /// Apply environment variable overrides to the configuration.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(remote) = std::env::var(env::REMOTE) {
            if !remote.trim().is_empty() {
                self.git.remote = remote;
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_origin() {
        let config = GitdockConfig::default();
        assert_eq!(config.git.remote, "origin");
        assert!(config.git.auto_stash);
        assert!(config.git.behind_check);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: GitdockConfig = toml::from_str("[git]\nremote = \"upstream\"\n").unwrap();
        assert_eq!(config.git.remote, "upstream");
        assert!(config.git.auto_stash);
    }
}
