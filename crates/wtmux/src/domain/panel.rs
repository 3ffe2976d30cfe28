//! Display projections used by the grid view.
//!
//! Panels are rebuilt from a [`Snapshot`] and the recents journal after every
//! refresh; they are never the source of truth for anything.

use std::path::{Path, PathBuf};

use crate::domain::recent::RecentEntry;
use crate::domain::session::SessionHandle;
use crate::domain::worktree::{OrphanSession, Snapshot, WorktreeState};

/// Identity used to find "the same thing" again after data is replaced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectionKey {
    /// A worktree or recent entry, matched by checkout path.
    Path(PathBuf),
    /// A live session, matched by session name.
    Session(String),
}

/// One grid cell describing a worktree, orphan session, or recent entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GridPanel {
    pub branch: String,
    pub display_name: String,
    pub has_session: bool,
    pub is_orphan: bool,
    pub is_recent: bool,
    pub last_activity: i64,
    pub modified_count: u32,
    pub pane_count: u32,
    /// Empty for orphan sessions, which have no checkout.
    pub path: PathBuf,
    pub process_names: Vec<String>,
    pub repo_name: String,
    pub session_name: String,
    pub staged_count: u32,
    pub window_count: u32,
}

impl GridPanel {
    /// Projects a reconciled worktree.
    pub fn from_worktree(state: &WorktreeState) -> Self {
        let handle = state.session_handle.as_ref();
        let status = state.status_summary.unwrap_or_default();

        Self {
            branch: state.branch_label().to_string(),
            display_name: state.working_tree.name.clone(),
            has_session: state.has_session,
            is_orphan: false,
            is_recent: false,
            last_activity: handle.map_or(0, |handle| handle.last_activity),
            modified_count: status.modified + status.untracked,
            pane_count: handle.map_or(0, |handle| handle.pane_count),
            path: state.working_tree.path.clone(),
            process_names: state.process_names.clone(),
            repo_name: state.repository.name.clone(),
            session_name: state.canonical_session_name.clone(),
            staged_count: status.staged,
            window_count: handle.map_or(0, |handle| handle.window_count),
        }
    }

    /// Projects a live session that has no worktree.
    pub fn from_orphan(orphan: &OrphanSession) -> Self {
        Self {
            branch: String::new(),
            display_name: orphan.name().to_string(),
            has_session: true,
            is_orphan: true,
            is_recent: false,
            last_activity: orphan.handle.last_activity,
            modified_count: 0,
            pane_count: orphan.handle.pane_count,
            path: PathBuf::new(),
            process_names: orphan.process_names.clone(),
            repo_name: String::new(),
            session_name: orphan.name().to_string(),
            staged_count: 0,
            window_count: orphan.handle.window_count,
        }
    }

    /// Projects a recents-journal entry, enriched with live session data when
    /// the remembered session is still running.
    pub fn from_recent(entry: &RecentEntry, live: Option<&SessionHandle>) -> Self {
        Self {
            branch: String::new(),
            display_name: entry.worktree.clone(),
            has_session: live.is_some(),
            is_orphan: false,
            is_recent: true,
            last_activity: live.map_or(entry.last_access_time, |handle| handle.last_activity),
            modified_count: 0,
            pane_count: live.map_or(0, |handle| handle.pane_count),
            path: entry.path.clone(),
            process_names: Vec::new(),
            repo_name: entry.repo_name.clone(),
            session_name: entry.session_name.clone(),
            staged_count: 0,
            window_count: live.map_or(0, |handle| handle.window_count),
        }
    }

    /// Returns the identity used to re-find this panel after a refresh.
    ///
    /// Anything with a checkout is keyed by path, so a worktree stays the
    /// same target when its session starts or dies. Orphans are keyed by
    /// session name.
    pub fn key(&self) -> SelectionKey {
        match self.checkout_path() {
            Some(path) => SelectionKey::Path(path.to_path_buf()),
            None => SelectionKey::Session(self.session_name.clone()),
        }
    }

    /// Returns whether `key` refers to this panel.
    pub fn matches_key(&self, key: &SelectionKey) -> bool {
        match key {
            SelectionKey::Path(path) => !self.path.as_os_str().is_empty() && self.path == *path,
            SelectionKey::Session(name) => self.has_session && self.session_name == *name,
        }
    }

    /// Case-insensitive substring match over display name, branch, and
    /// session name. `needle` must already be lowercase.
    pub fn matches_filter(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        [&self.display_name, &self.branch, &self.session_name]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Returns the checkout path when this panel has one.
    pub fn checkout_path(&self) -> Option<&Path> {
        if self.path.as_os_str().is_empty() {
            return None;
        }

        Some(self.path.as_path())
    }
}

/// The three data sections of the grid, built from one snapshot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PanelSet {
    /// Worktrees that have no live session.
    pub available: Vec<GridPanel>,
    /// Recently visited worktrees of other projects.
    pub recent: Vec<GridPanel>,
    /// Worktrees with a live session, followed by orphan sessions.
    pub sessions: Vec<GridPanel>,
}

impl PanelSet {
    /// Builds the grid sections from a snapshot and the recent entries to
    /// show.
    ///
    /// Recent entries that point at a worktree already present in the
    /// snapshot are skipped so no target is listed twice.
    pub fn build(snapshot: &Snapshot, recent_entries: &[&RecentEntry]) -> Self {
        let mut sessions: Vec<GridPanel> = snapshot
            .worktrees
            .iter()
            .filter(|state| state.has_session)
            .map(GridPanel::from_worktree)
            .collect();
        sessions.extend(snapshot.orphans.iter().map(GridPanel::from_orphan));

        let available = snapshot
            .worktrees
            .iter()
            .filter(|state| !state.has_session)
            .map(GridPanel::from_worktree)
            .collect();

        let recent = recent_entries
            .iter()
            .filter(|entry| snapshot.worktree_by_path(&entry.path).is_none())
            .map(|entry| {
                let live = snapshot
                    .sessions
                    .iter()
                    .find(|session| session.name == entry.session_name);

                GridPanel::from_recent(entry, live)
            })
            .collect();

        Self {
            available,
            recent,
            sessions,
        }
    }

    /// Returns the total number of data panels across all sections.
    pub fn len(&self) -> usize {
        self.sessions.len() + self.recent.len() + self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::Repository;
    use crate::domain::worktree::{StatusSummary, WorkingTree};

    fn worktree_state(name: &str, has_session: bool) -> WorktreeState {
        let repository = Repository::from_root(PathBuf::from("/repo/app"));

        WorktreeState {
            ahead_count: 0,
            behind_count: 0,
            canonical_session_name: name.to_string(),
            has_session,
            process_names: Vec::new(),
            recent_commits: Vec::new(),
            repository,
            session_handle: has_session.then(|| SessionHandle::named(name)),
            status_summary: Some(StatusSummary {
                modified: 2,
                staged: 1,
                untracked: 1,
            }),
            working_tree: WorkingTree {
                branch: Some(format!("feature/{name}")),
                name: name.to_string(),
                path: PathBuf::from(format!("/repo/{name}")),
            },
        }
    }

    fn orphan(name: &str) -> OrphanSession {
        OrphanSession {
            handle: SessionHandle::named(name),
            process_names: vec!["vim".to_string()],
        }
    }

    #[test]
    fn test_from_worktree_counts_untracked_as_modified() {
        // Arrange
        let state = worktree_state("feature-a", true);

        // Act
        let panel = GridPanel::from_worktree(&state);

        // Assert
        assert_eq!(panel.modified_count, 3);
        assert_eq!(panel.staged_count, 1);
        assert_eq!(panel.branch, "feature/feature-a");
        assert!(panel.has_session);
    }

    #[test]
    fn test_build_splits_sessions_orphans_and_available() {
        // Arrange
        let snapshot = Snapshot {
            orphans: vec![orphan("scratch")],
            sessions: vec![
                SessionHandle::named("feature-a"),
                SessionHandle::named("scratch"),
            ],
            worktrees: vec![
                worktree_state("feature-a", true),
                worktree_state("feature-b", false),
            ],
        };

        // Act
        let panel_set = PanelSet::build(&snapshot, &[]);

        // Assert
        let session_names: Vec<&str> = panel_set
            .sessions
            .iter()
            .map(|panel| panel.session_name.as_str())
            .collect();
        assert_eq!(session_names, vec!["feature-a", "scratch"]);
        assert!(panel_set.sessions[1].is_orphan);
        assert_eq!(panel_set.available.len(), 1);
        assert_eq!(panel_set.available[0].display_name, "feature-b");
    }

    #[test]
    fn test_build_skips_recent_entries_already_in_snapshot() {
        // Arrange
        let snapshot = Snapshot {
            orphans: Vec::new(),
            sessions: vec![SessionHandle::named("web")],
            worktrees: vec![worktree_state("feature-a", false)],
        };
        let duplicate = RecentEntry {
            last_access_time: 10,
            path: PathBuf::from("/repo/feature-a"),
            repo_name: "app".to_string(),
            repo_root: PathBuf::from("/repo/app"),
            session_name: "feature-a".to_string(),
            worktree: "feature-a".to_string(),
        };
        let other = RecentEntry {
            last_access_time: 20,
            path: PathBuf::from("/other/web"),
            repo_name: "other".to_string(),
            repo_root: PathBuf::from("/other/web"),
            session_name: "web".to_string(),
            worktree: "web".to_string(),
        };

        // Act
        let panel_set = PanelSet::build(&snapshot, &[&duplicate, &other]);

        // Assert
        assert_eq!(panel_set.recent.len(), 1);
        assert_eq!(panel_set.recent[0].display_name, "web");
        assert!(panel_set.recent[0].has_session);
        assert!(panel_set.recent[0].is_recent);
    }

    #[test]
    fn test_matches_filter_checks_name_branch_and_session() {
        // Arrange
        let panel = GridPanel::from_worktree(&worktree_state("payments", true));

        // Act
        let by_branch = panel.matches_filter("feature/");
        let by_name = panel.matches_filter("pay");
        let missing = panel.matches_filter("billing");

        // Assert
        assert!(by_branch);
        assert!(by_name);
        assert!(!missing);
    }

    #[test]
    fn test_key_uses_path_for_worktrees_and_session_for_orphans() {
        // Arrange
        let live = GridPanel::from_worktree(&worktree_state("feature-a", true));
        let idle = GridPanel::from_worktree(&worktree_state("feature-b", false));
        let orphan_panel = GridPanel::from_orphan(&orphan("scratch"));

        // Act
        let live_key = live.key();
        let idle_key = idle.key();
        let orphan_key = orphan_panel.key();

        // Assert
        assert_eq!(live_key, SelectionKey::Path(PathBuf::from("/repo/feature-a")));
        assert_eq!(idle_key, SelectionKey::Path(PathBuf::from("/repo/feature-b")));
        assert_eq!(orphan_key, SelectionKey::Session("scratch".to_string()));
        assert!(live.matches_key(&SelectionKey::Session("feature-a".to_string())));
        assert!(!orphan_panel.matches_key(&SelectionKey::Path(PathBuf::new())));
    }
}
