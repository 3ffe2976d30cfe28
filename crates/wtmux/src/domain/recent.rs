use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One remembered jump target, persisted in the recents journal.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RecentEntry {
    /// Unix timestamp (seconds) of the latest jump or adoption.
    pub last_access_time: i64,
    pub path: PathBuf,
    pub repo_name: String,
    pub repo_root: PathBuf,
    pub session_name: String,
    pub worktree: String,
}

impl RecentEntry {
    /// Returns whether this entry describes the same worktree of the same
    /// repository as `repo_root`/`worktree`.
    pub fn is_same_target(&self, repo_root: &std::path::Path, worktree: &str) -> bool {
        self.repo_root == repo_root && self.worktree == worktree
    }
}
