//! Error types and result aliases for gitdock.
//!
//! This module provides a comprehensive error handling system with:
//! - Specific error variants for different failure modes
//! - User-friendly error messages with recovery suggestions
//! - Helper methods for error classification
//! - Automatic conversion from common error types

use thiserror::Error;

use crate::git::GitError;
use crate::repository::RepositoryError;

/// Main error type for gitdock operations.
///
/// Each variant includes a user-friendly message with actionable recovery
/// steps. Operation-level code converts these into structured results at
/// the caller boundary; only setup and CLI plumbing propagate them.
#[derive(Error, Debug)]
pub enum GitdockError {
    /// General configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}. Check file permissions and format.")]
    ConfigRead(String),

    /// Failed to write configuration file.
    #[error("Failed to write configuration file: {0}. Check directory permissions.")]
    ConfigWrite(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON or TOML serialization/deserialization failed.
    #[error("Data serialization error: {0}. This may indicate corrupted data.")]
    Serialization(String),

    /// Repository context error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Git operation error.
    #[error(transparent)]
    Git(#[from] GitError),
}

impl GitdockError {
    /// Checks if this error means no usable repository was resolvable;
    /// the user should open one and retry.
    #[allow(dead_code)] // Kept for future use in the main error handler
    #[must_use]
    pub const fn needs_repository(&self) -> bool {
        match self {
            Self::Repository(e) => e.is_no_repository(),
            Self::Git(e) => e.is_not_repository(),
            _ => false,
        }
    }
}

/// Result type alias using [`GitdockError`].
pub type Result<T> = std::result::Result<T, GitdockError>;

impl From<serde_json::Error> for GitdockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON error: {err}"))
    }
}

impl From<toml::de::Error> for GitdockError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigRead(format!("TOML parse error: {err}"))
    }
}

impl From<toml::ser::Error> for GitdockError {
    fn from(err: toml::ser::Error) -> Self {
        Self::ConfigWrite(format!("TOML serialize error: {err}"))
    }
}
