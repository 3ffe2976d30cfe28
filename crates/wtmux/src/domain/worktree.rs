use std::path::PathBuf;

use crate::domain::repository::Repository;
use crate::domain::session::SessionHandle;

/// One checkout registered with `git worktree`, identified by `path`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkingTree {
    /// Checked-out branch, `None` for detached heads.
    pub branch: Option<String>,
    pub name: String,
    pub path: PathBuf,
}

/// Local change counts reported by `git status`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatusSummary {
    pub modified: u32,
    pub staged: u32,
    pub untracked: u32,
}

impl StatusSummary {
    /// Returns whether the worktree has no local changes at all.
    pub fn is_clean(&self) -> bool {
        self.modified == 0 && self.staged == 0 && self.untracked == 0
    }
}

/// One entry of `git log --oneline`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitSummary {
    pub hash: String,
    pub message: String,
}

/// Reconciled view of one worktree and the session that belongs to it.
///
/// Rebuilt from scratch on every refresh and never mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorktreeState {
    pub ahead_count: u32,
    pub behind_count: u32,
    pub canonical_session_name: String,
    pub has_session: bool,
    pub process_names: Vec<String>,
    pub recent_commits: Vec<CommitSummary>,
    pub repository: Repository,
    pub session_handle: Option<SessionHandle>,
    pub status_summary: Option<StatusSummary>,
    pub working_tree: WorkingTree,
}

impl WorktreeState {
    /// Returns whether this is the repository's primary checkout.
    pub fn is_main(&self) -> bool {
        self.working_tree.path == self.repository.root
    }

    /// Returns the branch label, or `detached` when no branch is checked out.
    pub fn branch_label(&self) -> &str {
        self.working_tree.branch.as_deref().unwrap_or("detached")
    }
}

/// A live session whose name matches no worktree's canonical session name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrphanSession {
    pub handle: SessionHandle,
    pub process_names: Vec<String>,
}

impl OrphanSession {
    pub fn name(&self) -> &str {
        &self.handle.name
    }
}

/// Everything one refresh produced.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    pub orphans: Vec<OrphanSession>,
    /// Every live session observed during the refresh, in tmux order.
    pub sessions: Vec<SessionHandle>,
    pub worktrees: Vec<WorktreeState>,
}

impl Snapshot {
    /// Finds a worktree state by its checkout path.
    pub fn worktree_by_path(&self, path: &std::path::Path) -> Option<&WorktreeState> {
        self.worktrees
            .iter()
            .find(|state| state.working_tree.path == path)
    }

    /// Finds an orphan by session name.
    pub fn orphan_by_name(&self, name: &str) -> Option<&OrphanSession> {
        self.orphans.iter().find(|orphan| orphan.name() == name)
    }

    /// Returns whether a live session named `name` was observed.
    pub fn has_live_session(&self, name: &str) -> bool {
        self.sessions.iter().any(|session| session.name == name)
    }
}
