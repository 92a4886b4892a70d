//! Client state persistence for gitdock.
//!
//! Tracks the last opened repository and a capped recent-repository
//! history so the client can restore its context on the next start.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::{ensure_data_dir, state_file};
use crate::error::Result;

/// Maximum number of recent-repository entries to keep.
const MAX_RECENT_ENTRIES: usize = 50;

/// A recent-repository entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentRepository {
    /// Repository root path.
    pub path: String,
    /// When the repository was last opened.
    pub opened_at: DateTime<Utc>,
}

/// Persistent client state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientState {
    /// Root path of the repository that was active when the client last
    /// ran.
    #[serde(default)]
    pub last_repository: Option<String>,

    /// Recently opened repositories (most recent first).
    #[serde(default)]
    pub recent: Vec<RecentRepository>,
}

impl ClientState {
    /// Load state from disk, or return default if not found.
    pub fn load() -> Result<Self> {
        let path = state_file()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let state: Self = serde_json::from_str(&contents).unwrap_or_default();

        Ok(state)
    }

    /// Save state to disk.
    pub fn save(&self) -> Result<()> {
        ensure_data_dir()?;
        let path = state_file()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        Ok(())
    }

    /// Records a repository as the last opened one and moves it to the
    /// front of the recent list.
    pub fn set_last_repository(&mut self, repo_path: &Path) {
        let key = repo_path.to_string_lossy().to_string();
        self.last_repository = Some(key.clone());

        self.recent.retain(|entry| entry.path != key);
        self.recent.insert(
            0,
            RecentRepository {
                path: key,
                opened_at: Utc::now(),
            },
        );
        if self.recent.len() > MAX_RECENT_ENTRIES {
            self.recent.truncate(MAX_RECENT_ENTRIES);
        }
    }

    /// Clears the last-opened repository (the recent list is kept).
    pub fn clear_last_repository(&mut self) {
        self.last_repository = None;
    }

    /// Recent repositories, most recent first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> &[RecentRepository] {
        let end = limit.min(self.recent.len());
        &self.recent[..end]
    }
}
