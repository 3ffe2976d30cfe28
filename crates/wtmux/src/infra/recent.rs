//! Persisted journal of recently jumped-to worktrees.
//!
//! The whole file is rewritten on every mutation; concurrent instances are
//! last-writer-wins. Mutations only touch memory and hand back a
//! [`JournalWrite`] that is persisted off the control loop.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::recent::RecentEntry;

const RECENT_FILE_NAME: &str = "recent.json";

/// Fields that identify a jump target when recording it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecentVisit {
    pub path: PathBuf,
    pub repo_name: String,
    pub repo_root: PathBuf,
    pub session_name: String,
    pub worktree: String,
}

impl From<&RecentEntry> for RecentVisit {
    fn from(entry: &RecentEntry) -> Self {
        Self {
            path: entry.path.clone(),
            repo_name: entry.repo_name.clone(),
            repo_root: entry.repo_root.clone(),
            session_name: entry.session_name.clone(),
            worktree: entry.worktree.clone(),
        }
    }
}

/// In-memory recents list backed by a JSON file, most recent first.
pub struct RecentJournal {
    entries: Vec<RecentEntry>,
    file_path: PathBuf,
    limit: usize,
    sequence: u64,
    written_sequence: Arc<Mutex<u64>>,
}

/// One serialized journal state waiting to be written to disk.
///
/// Writes may finish out of order; a write older than the last one on disk
/// is skipped.
#[derive(Debug)]
pub struct JournalWrite {
    content: String,
    file_path: PathBuf,
    sequence: u64,
    written_sequence: Arc<Mutex<u64>>,
}

impl JournalWrite {
    /// Writes the journal file, creating its directory when missing.
    ///
    /// # Errors
    /// Returns an error when the directory or file cannot be written.
    pub async fn persist(self) -> Result<(), String> {
        let mut written_sequence = self.written_sequence.lock().await;
        if *written_sequence > self.sequence {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                format!("Failed to create {}: {error}", parent.display())
            })?;
        }
        tokio::fs::write(&self.file_path, self.content)
            .await
            .map_err(|error| format!("Failed to write {}: {error}", self.file_path.display()))?;
        *written_sequence = self.sequence;

        Ok(())
    }
}

impl RecentJournal {
    /// Loads the journal from `<dir>/recent.json`.
    ///
    /// A missing or unreadable file yields an empty journal.
    pub fn load(dir: &Path, limit: usize) -> Self {
        let file_path = dir.join(RECENT_FILE_NAME);
        let entries = match fs::read_to_string(&file_path) {
            Ok(content) => serde_json::from_str::<Vec<RecentEntry>>(&content).unwrap_or_else(
                |error| {
                    warn!(
                        path = %file_path.display(),
                        %error,
                        "Discarding corrupt recents journal"
                    );

                    Vec::new()
                },
            ),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(error) => {
                warn!(path = %file_path.display(), %error, "Failed to read recents journal");

                Vec::new()
            }
        };

        let mut journal = Self {
            entries,
            file_path,
            limit,
            sequence: 0,
            written_sequence: Arc::new(Mutex::new(0)),
        };
        journal.sort_and_prune();

        journal
    }

    /// Records a visit stamped with the current time.
    ///
    /// # Errors
    /// Returns an error when the journal cannot be serialized.
    pub fn add(&mut self, visit: RecentVisit) -> Result<JournalWrite, String> {
        self.add_at(visit, time::OffsetDateTime::now_utc().unix_timestamp())
    }

    /// Records a visit with an explicit timestamp, replacing any previous
    /// entry for the same repository and worktree.
    ///
    /// # Errors
    /// Returns an error when the journal cannot be serialized.
    pub fn add_at(
        &mut self,
        visit: RecentVisit,
        last_access_time: i64,
    ) -> Result<JournalWrite, String> {
        self.entries
            .retain(|entry| !entry.is_same_target(&visit.repo_root, &visit.worktree));
        self.entries.insert(
            0,
            RecentEntry {
                last_access_time,
                path: visit.path,
                repo_name: visit.repo_name,
                repo_root: visit.repo_root,
                session_name: visit.session_name,
                worktree: visit.worktree,
            },
        );
        self.entries.truncate(self.limit);

        self.pending_write()
    }

    /// Returns every entry, most recent first.
    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    /// Returns entries that belong to repositories other than
    /// `current_root`, most recent first.
    pub fn other_projects(&self, current_root: Option<&Path>) -> Vec<&RecentEntry> {
        self.entries
            .iter()
            .filter(|entry| current_root.is_none_or(|root| entry.repo_root != root))
            .collect()
    }

    /// Returns the distinct repository roots, most recently visited first.
    pub fn projects(&self) -> Vec<PathBuf> {
        let mut projects: Vec<PathBuf> = Vec::new();
        for entry in &self.entries {
            if !projects.contains(&entry.repo_root) {
                projects.push(entry.repo_root.clone());
            }
        }

        projects
    }

    fn sort_and_prune(&mut self) {
        self.entries
            .sort_by(|left, right| right.last_access_time.cmp(&left.last_access_time));
        let mut seen: Vec<(PathBuf, String)> = Vec::new();
        self.entries.retain(|entry| {
            let key = (entry.repo_root.clone(), entry.worktree.clone());
            if seen.contains(&key) {
                return false;
            }
            seen.push(key);

            true
        });
        self.entries.truncate(self.limit);
    }

    fn pending_write(&mut self) -> Result<JournalWrite, String> {
        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|error| format!("Failed to serialize recents journal: {error}"))?;
        self.sequence += 1;

        Ok(JournalWrite {
            content,
            file_path: self.file_path.clone(),
            sequence: self.sequence,
            written_sequence: Arc::clone(&self.written_sequence),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn visit(repo_root: &str, worktree: &str) -> RecentVisit {
        RecentVisit {
            path: PathBuf::from(format!("{repo_root}-{worktree}")),
            repo_name: repo_root.rsplit('/').next().unwrap_or_default().to_string(),
            repo_root: PathBuf::from(repo_root),
            session_name: worktree.to_string(),
            worktree: worktree.to_string(),
        }
    }

    #[test]
    fn test_load_missing_file_returns_empty_journal() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");

        // Act
        let journal = RecentJournal::load(temp_dir.path(), 20);

        // Assert
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_returns_empty_journal() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(RECENT_FILE_NAME), "[{ broken")
            .expect("failed to write journal");

        // Act
        let journal = RecentJournal::load(temp_dir.path(), 20);

        // Assert
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn test_add_same_target_twice_keeps_one_entry_with_newer_timestamp() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut journal = RecentJournal::load(temp_dir.path(), 20);

        // Act
        journal
            .add_at(visit("/src/app", "feature"), 100)
            .expect("failed to add visit");
        journal
            .add_at(visit("/src/app", "feature"), 200)
            .expect("failed to add visit");

        // Assert
        assert_eq!(journal.entries().len(), 1);
        assert_eq!(journal.entries()[0].last_access_time, 200);
    }

    #[tokio::test]
    async fn test_add_moves_entry_to_front_and_persists() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut journal = RecentJournal::load(temp_dir.path(), 20);
        journal
            .add_at(visit("/src/app", "one"), 100)
            .expect("failed to add visit");
        journal
            .add_at(visit("/src/web", "two"), 200)
            .expect("failed to add visit");

        // Act
        journal
            .add_at(visit("/src/app", "one"), 300)
            .expect("failed to add visit")
            .persist()
            .await
            .expect("failed to persist journal");
        let reloaded = RecentJournal::load(temp_dir.path(), 20);

        // Assert
        let worktrees: Vec<&str> = reloaded
            .entries()
            .iter()
            .map(|entry| entry.worktree.as_str())
            .collect();
        assert_eq!(worktrees, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_stale_write_does_not_overwrite_newer_one() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut journal = RecentJournal::load(temp_dir.path(), 20);
        let older = journal
            .add_at(visit("/src/app", "one"), 100)
            .expect("failed to add visit");
        let newer = journal
            .add_at(visit("/src/web", "two"), 200)
            .expect("failed to add visit");

        // Act
        newer.persist().await.expect("failed to persist journal");
        older.persist().await.expect("failed to persist journal");
        let reloaded = RecentJournal::load(temp_dir.path(), 20);

        // Assert
        assert_eq!(reloaded.entries().len(), 2);
        assert_eq!(reloaded.entries()[0].worktree, "two");
    }

    #[test]
    fn test_add_does_not_touch_disk_until_persisted() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut journal = RecentJournal::load(temp_dir.path(), 20);

        // Act
        let _write = journal
            .add_at(visit("/src/app", "one"), 100)
            .expect("failed to add visit");

        // Assert
        assert_eq!(journal.entries().len(), 1);
        assert!(!temp_dir.path().join(RECENT_FILE_NAME).exists());
    }

    #[test]
    fn test_add_prunes_to_limit() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut journal = RecentJournal::load(temp_dir.path(), 2);

        // Act
        for (index, worktree) in ["a", "b", "c"].into_iter().enumerate() {
            journal
                .add_at(visit("/src/app", worktree), i64::try_from(index).unwrap_or(0))
                .expect("failed to add visit");
        }

        // Assert
        let worktrees: Vec<&str> = journal
            .entries()
            .iter()
            .map(|entry| entry.worktree.as_str())
            .collect();
        assert_eq!(worktrees, vec!["c", "b"]);
    }

    #[test]
    fn test_other_projects_excludes_current_repository() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut journal = RecentJournal::load(temp_dir.path(), 20);
        journal
            .add_at(visit("/src/app", "one"), 100)
            .expect("failed to add visit");
        journal
            .add_at(visit("/src/web", "two"), 200)
            .expect("failed to add visit");

        // Act
        let others = journal.other_projects(Some(Path::new("/src/app")));
        let everything = journal.other_projects(None);

        // Assert
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].worktree, "two");
        assert_eq!(everything.len(), 2);
    }

    #[test]
    fn test_projects_returns_distinct_roots_in_recency_order() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut journal = RecentJournal::load(temp_dir.path(), 20);
        journal
            .add_at(visit("/src/app", "one"), 100)
            .expect("failed to add visit");
        journal
            .add_at(visit("/src/web", "two"), 200)
            .expect("failed to add visit");
        journal
            .add_at(visit("/src/app", "three"), 300)
            .expect("failed to add visit");

        // Act
        let projects = journal.projects();

        // Assert
        assert_eq!(
            projects,
            vec![PathBuf::from("/src/app"), PathBuf::from("/src/web")]
        );
    }
}
