//! Joins git worktree state with tmux session state and exposes the
//! mutations that keep the two paired.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::{SessionNaming, WorktreeLayout};
use crate::domain::repository::{Repository, path_basename};
use crate::domain::session::SessionHandle;
use crate::domain::worktree::{OrphanSession, Snapshot, WorkingTree, WorktreeState};
use crate::infra::git::{GitClient, order_with_default_first};
use crate::infra::recent::RecentVisit;
use crate::infra::tmux::TmuxClient;

/// Directory used for worktrees under the `Nested` layout.
pub const NESTED_WORKTREE_DIR: &str = ".worktrees";

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ReconcileError {
    /// A backend call failed where no degraded answer is acceptable.
    #[error("{0}")]
    BackendUnavailable(String),
    /// The requested operation is not allowed in the current state.
    #[error("{0}")]
    PreconditionViolation(String),
}

/// Result of a successful `create_worktree`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateOutcome {
    pub path: PathBuf,
    /// Set when the worktree exists but its session could not be started.
    pub session_error: Option<String>,
    pub session_name: String,
}

/// What a jump should land on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum JumpTarget {
    /// A worktree of `repository`, jumped to through its canonical session.
    Worktree {
        path: PathBuf,
        repository: Repository,
    },
    /// A session known by name, such as an orphan or a recent entry.
    ///
    /// With a `path` the session is recreated there when it is gone.
    Session {
        name: String,
        path: Option<PathBuf>,
        visit: Option<RecentVisit>,
    },
}

/// Result of a successful `jump`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JumpOutcome {
    pub created: bool,
    /// Legacy session name that was renamed to `session_name`.
    pub renamed_from: Option<String>,
    pub session_name: String,
    /// Visit to record in the recents journal.
    pub visit: Option<RecentVisit>,
}

/// Replaces characters tmux rejects in target names.
pub fn sanitize_session_name(name: &str) -> String {
    name.replace(['.', ':'], "-")
}

/// Computes the canonical session name for a worktree.
///
/// `branch` is only consulted by [`SessionNaming::Branch`]; a missing or
/// empty branch falls back to the basename.
pub fn canonical_session_name(naming: SessionNaming, path: &Path, branch: Option<&str>) -> String {
    let basename = path_basename(path);
    let source = match naming {
        SessionNaming::Basename => basename.as_str(),
        SessionNaming::Branch => branch
            .map(str::trim)
            .filter(|branch| !branch.is_empty())
            .unwrap_or(basename.as_str()),
    };

    sanitize_session_name(source)
}

/// Validates a user-supplied worktree name.
///
/// # Errors
/// Returns `PreconditionViolation` for empty names, names with whitespace, or
/// names containing `..`.
pub fn validate_worktree_name(name: &str) -> Result<(), ReconcileError> {
    if name.is_empty() {
        return Err(ReconcileError::PreconditionViolation(
            "Worktree name cannot be empty".to_string(),
        ));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ReconcileError::PreconditionViolation(format!(
            "Worktree name `{name}` cannot contain whitespace"
        )));
    }
    if name.contains("..") {
        return Err(ReconcileError::PreconditionViolation(format!(
            "Worktree name `{name}` cannot contain `..`"
        )));
    }

    Ok(())
}

/// Returns where `create_worktree` places a worktree called `name`.
pub fn worktree_path(layout: WorktreeLayout, repository: &Repository, name: &str) -> PathBuf {
    match layout {
        WorktreeLayout::Sibling => {
            sibling_parent(&repository.root).join(format!("{}-{name}", repository.name))
        }
        WorktreeLayout::Nested => repository.root.join(NESTED_WORKTREE_DIR).join(name),
    }
}

/// Returns where `adopt_orphan` places the worktree for `session_name`.
pub fn adoption_path(
    layout: WorktreeLayout,
    repository: &Repository,
    session_name: &str,
) -> PathBuf {
    match layout {
        WorktreeLayout::Sibling => sibling_parent(&repository.root).join(session_name),
        WorktreeLayout::Nested => repository.root.join(NESTED_WORKTREE_DIR).join(session_name),
    }
}

fn sibling_parent(root: &Path) -> PathBuf {
    root.parent()
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf)
}

/// Reconciliation service over the git and tmux adapters.
///
/// Cheap to clone; background tasks take their own copy.
#[derive(Clone)]
pub struct Reconciler {
    commit_count: usize,
    enrichment_timeout: Duration,
    git_client: Arc<dyn GitClient>,
    layout: WorktreeLayout,
    naming: SessionNaming,
    tmux_client: Arc<dyn TmuxClient>,
}

/// Options that shape reconciliation, taken from the user config.
#[derive(Clone, Copy, Debug)]
pub struct ReconcileOptions {
    pub commit_count: usize,
    pub enrichment_timeout: Duration,
    pub layout: WorktreeLayout,
    pub naming: SessionNaming,
}

impl Reconciler {
    pub fn new(
        git_client: Arc<dyn GitClient>,
        tmux_client: Arc<dyn TmuxClient>,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            commit_count: options.commit_count,
            enrichment_timeout: options.enrichment_timeout,
            git_client,
            layout: options.layout,
            naming: options.naming,
            tmux_client,
        }
    }

    pub fn naming(&self) -> SessionNaming {
        self.naming
    }

    pub fn layout(&self) -> WorktreeLayout {
        self.layout
    }

    /// Returns the git adapter, used for repository discovery at startup.
    pub fn git_client(&self) -> Arc<dyn GitClient> {
        Arc::clone(&self.git_client)
    }

    /// Returns the tmux adapter, used by preview capture.
    pub fn tmux_client(&self) -> Arc<dyn TmuxClient> {
        Arc::clone(&self.tmux_client)
    }

    /// Resolves the canonical session name for the worktree at `path`.
    ///
    /// Under the branch policy a failed or empty branch query falls back to
    /// the basename.
    pub async fn session_name(&self, path: &Path) -> String {
        let branch = match self.naming {
            SessionNaming::Basename => None,
            SessionNaming::Branch => {
                match self.git_client.current_branch(path.to_path_buf()).await {
                    Ok(branch) => Some(branch),
                    Err(error) => {
                        debug!(
                            path = %path.display(),
                            %error,
                            "Falling back to basename session name"
                        );

                        None
                    }
                }
            }
        };

        canonical_session_name(self.naming, path, branch.as_deref())
    }

    /// Lists the worktrees of `repository` joined with live sessions.
    ///
    /// # Errors
    /// Returns `BackendUnavailable` when worktrees cannot be enumerated.
    pub async fn list(&self, repository: &Repository) -> Result<Snapshot, ReconcileError> {
        let live_sessions = self.live_sessions().await;
        let worktrees = self.list_worktrees(repository, &live_sessions).await?;

        Ok(self.assemble_snapshot(worktrees, live_sessions).await)
    }

    /// Lists the worktrees of every repository in `repositories`.
    ///
    /// Repositories that fail to enumerate are skipped.
    ///
    /// # Errors
    /// Returns the last `BackendUnavailable` when every repository fails.
    pub async fn scan(&self, repositories: &[Repository]) -> Result<Snapshot, ReconcileError> {
        let live_sessions = self.live_sessions().await;
        let mut worktrees = Vec::new();
        let mut last_error = None;
        let mut listed_any = false;

        for repository in repositories {
            match self.list_worktrees(repository, &live_sessions).await {
                Ok(states) => {
                    listed_any = true;
                    worktrees.extend(states);
                }
                Err(error) => {
                    warn!(
                        repo = %repository.root.display(),
                        %error,
                        "Skipping repository during scan"
                    );
                    last_error = Some(error);
                }
            }
        }

        if !listed_any && let Some(error) = last_error {
            return Err(error);
        }

        Ok(self.assemble_snapshot(worktrees, live_sessions).await)
    }

    /// Creates a worktree called `name` and best-effort starts its session.
    ///
    /// # Errors
    /// Returns `PreconditionViolation` for invalid names or an existing
    /// target path, and `BackendUnavailable` when git refuses.
    pub async fn create_worktree(
        &self,
        repository: &Repository,
        name: &str,
        base_branch: &str,
    ) -> Result<CreateOutcome, ReconcileError> {
        validate_worktree_name(name)?;
        let path = worktree_path(self.layout, repository, name);
        self.add_worktree(repository, &path, name, base_branch).await?;

        let session_name = self.session_name(&path).await;
        let session_error = self
            .tmux_client
            .new_session(session_name.clone(), path.clone())
            .await
            .err();
        if let Some(error) = &session_error {
            warn!(session = %session_name, %error, "Worktree created without a session");
        }
        info!(path = %path.display(), session = %session_name, "Created worktree");

        Ok(CreateOutcome {
            path,
            session_error,
            session_name,
        })
    }

    /// Kills the session of the worktree at `path` and removes the worktree.
    ///
    /// # Errors
    /// Returns `PreconditionViolation`, before touching any backend, when
    /// `path` is the active worktree or the main worktree.
    pub async fn delete_worktree(
        &self,
        repository: &Repository,
        path: &Path,
        active_path: Option<&Path>,
    ) -> Result<(), ReconcileError> {
        if active_path == Some(path) {
            return Err(ReconcileError::PreconditionViolation(
                "Cannot delete the worktree you are working in".to_string(),
            ));
        }
        if path == repository.root {
            return Err(ReconcileError::PreconditionViolation(
                "Cannot delete the main worktree".to_string(),
            ));
        }

        let session_name = self.session_name(path).await;
        if let Err(error) = self.tmux_client.kill_session(session_name.clone()).await {
            debug!(session = %session_name, %error, "No session to kill before delete");
        }

        self.git_client
            .worktree_remove(repository.root.clone(), path.to_path_buf(), true)
            .await
            .map_err(ReconcileError::BackendUnavailable)?;
        info!(path = %path.display(), "Deleted worktree");

        Ok(())
    }

    /// Gives the orphan session `session_name` a worktree of its own and
    /// moves the session into it.
    ///
    /// # Errors
    /// Returns `PreconditionViolation` when the resulting worktree would not
    /// be canonically named after the session, and `BackendUnavailable` when
    /// git or tmux fail.
    pub async fn adopt_orphan(
        &self,
        repository: &Repository,
        session_name: &str,
        base_branch: &str,
    ) -> Result<PathBuf, ReconcileError> {
        validate_worktree_name(session_name)?;
        let path = adoption_path(self.layout, repository, session_name);
        let expected = canonical_session_name(self.naming, &path, Some(session_name));
        if expected != session_name {
            return Err(ReconcileError::PreconditionViolation(format!(
                "Session `{session_name}` cannot be adopted; its worktree would be named `{expected}`"
            )));
        }

        self.add_worktree(repository, &path, session_name, base_branch)
            .await?;
        self.tmux_client
            .redirect_session(session_name.to_string(), path.clone())
            .await
            .map_err(|error| {
                ReconcileError::BackendUnavailable(format!(
                    "Worktree created at {} but the session was not moved: {error}",
                    path.display()
                ))
            })?;
        info!(session = %session_name, path = %path.display(), "Adopted orphan session");

        Ok(path)
    }

    /// Kills the live session `name`.
    ///
    /// # Errors
    /// Returns `PreconditionViolation` when no such session exists.
    pub async fn kill_session(&self, name: &str) -> Result<(), ReconcileError> {
        let exists = self
            .tmux_client
            .has_session(name.to_string())
            .await
            .map_err(ReconcileError::BackendUnavailable)?;
        if !exists {
            return Err(ReconcileError::PreconditionViolation(format!(
                "Session `{name}` does not exist"
            )));
        }

        self.tmux_client
            .kill_session(name.to_string())
            .await
            .map_err(ReconcileError::BackendUnavailable)?;
        info!(session = %name, "Killed session");

        Ok(())
    }

    /// Switches the tmux client to `target`, creating or renaming its
    /// session first when needed.
    ///
    /// # Errors
    /// Returns `PreconditionViolation` when a pathless session target no
    /// longer exists, and `BackendUnavailable` when tmux fails.
    pub async fn jump(&self, target: JumpTarget) -> Result<JumpOutcome, ReconcileError> {
        let outcome = match target {
            JumpTarget::Worktree { path, repository } => {
                self.jump_to_worktree(&repository, path).await?
            }
            JumpTarget::Session { name, path, visit } => {
                self.jump_to_session(name, path, visit).await?
            }
        };

        self.tmux_client
            .switch_client(outcome.session_name.clone())
            .await
            .map_err(ReconcileError::BackendUnavailable)?;
        info!(session = %outcome.session_name, created = outcome.created, "Jumped to session");

        Ok(outcome)
    }

    /// Lists local branches with the default branch first.
    ///
    /// # Errors
    /// Returns `BackendUnavailable` when branches cannot be listed.
    pub async fn branches(&self, repository: &Repository) -> Result<Vec<String>, ReconcileError> {
        let branches = self
            .git_client
            .branches(repository.root.clone())
            .await
            .map_err(ReconcileError::BackendUnavailable)?;

        match self.git_client.default_branch(repository.root.clone()).await {
            Ok(default_branch) => Ok(order_with_default_first(branches, &default_branch)),
            Err(error) => {
                debug!(repo = %repository.root.display(), %error, "No default branch found");

                Ok(branches)
            }
        }
    }

    async fn jump_to_worktree(
        &self,
        repository: &Repository,
        path: PathBuf,
    ) -> Result<JumpOutcome, ReconcileError> {
        let session_name = self.session_name(&path).await;
        let visit = Some(RecentVisit {
            path: path.clone(),
            repo_name: repository.name.clone(),
            repo_root: repository.root.clone(),
            session_name: session_name.clone(),
            worktree: path_basename(&path),
        });

        if self.session_exists(&session_name).await? {
            return Ok(JumpOutcome {
                created: false,
                renamed_from: None,
                session_name,
                visit,
            });
        }

        let legacy_name = sanitize_session_name(&path_basename(&path));
        if legacy_name != session_name && self.session_exists(&legacy_name).await? {
            self.tmux_client
                .rename_session(legacy_name.clone(), session_name.clone())
                .await
                .map_err(ReconcileError::BackendUnavailable)?;
            info!(from = %legacy_name, to = %session_name, "Renamed legacy session");

            return Ok(JumpOutcome {
                created: false,
                renamed_from: Some(legacy_name),
                session_name,
                visit,
            });
        }

        self.tmux_client
            .new_session(session_name.clone(), path)
            .await
            .map_err(ReconcileError::BackendUnavailable)?;

        Ok(JumpOutcome {
            created: true,
            renamed_from: None,
            session_name,
            visit,
        })
    }

    async fn jump_to_session(
        &self,
        name: String,
        path: Option<PathBuf>,
        visit: Option<RecentVisit>,
    ) -> Result<JumpOutcome, ReconcileError> {
        if self.session_exists(&name).await? {
            return Ok(JumpOutcome {
                created: false,
                renamed_from: None,
                session_name: name,
                visit,
            });
        }

        let Some(path) = path else {
            return Err(ReconcileError::PreconditionViolation(format!(
                "Session `{name}` no longer exists"
            )));
        };
        self.tmux_client
            .new_session(name.clone(), path)
            .await
            .map_err(ReconcileError::BackendUnavailable)?;

        Ok(JumpOutcome {
            created: true,
            renamed_from: None,
            session_name: name,
            visit,
        })
    }

    async fn session_exists(&self, name: &str) -> Result<bool, ReconcileError> {
        self.tmux_client
            .has_session(name.to_string())
            .await
            .map_err(ReconcileError::BackendUnavailable)
    }

    async fn add_worktree(
        &self,
        repository: &Repository,
        path: &Path,
        branch_name: &str,
        base_branch: &str,
    ) -> Result<(), ReconcileError> {
        let path_exists = tokio::fs::try_exists(path).await.unwrap_or(false);
        if path_exists {
            return Err(ReconcileError::PreconditionViolation(format!(
                "Path {} already exists",
                path.display()
            )));
        }

        let branch_exists = self
            .git_client
            .branch_exists(repository.root.clone(), branch_name.to_string())
            .await
            .map_err(ReconcileError::BackendUnavailable)?;
        let base_branch = (!branch_exists).then(|| base_branch.to_string());

        self.git_client
            .worktree_add(
                repository.root.clone(),
                path.to_path_buf(),
                branch_name.to_string(),
                base_branch,
            )
            .await
            .map_err(ReconcileError::BackendUnavailable)
    }

    /// Lists live session names; a failing tmux (no server) means none.
    async fn live_sessions(&self) -> Vec<String> {
        match self.tmux_client.list_sessions().await {
            Ok(sessions) => sessions,
            Err(error) => {
                debug!(%error, "Treating tmux as having no sessions");

                Vec::new()
            }
        }
    }

    async fn list_worktrees(
        &self,
        repository: &Repository,
        live_sessions: &[String],
    ) -> Result<Vec<WorktreeState>, ReconcileError> {
        let working_trees = self
            .git_client
            .worktree_list(repository.root.clone())
            .await
            .map_err(ReconcileError::BackendUnavailable)?;

        let mut join_set = JoinSet::new();
        for (index, working_tree) in working_trees.into_iter().enumerate() {
            let canonical_name = canonical_session_name(
                self.naming,
                &working_tree.path,
                working_tree.branch.as_deref(),
            );
            let has_session = live_sessions.contains(&canonical_name);
            let reconciler = self.clone();
            let repository = repository.clone();

            join_set.spawn(async move {
                let state = reconciler
                    .enrich_worktree(repository, working_tree, canonical_name, has_session)
                    .await;

                (index, state)
            });
        }

        let mut indexed_states = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(indexed_state) => indexed_states.push(indexed_state),
                Err(error) => warn!(%error, "Worktree enrichment task failed"),
            }
        }
        indexed_states.sort_by_key(|(index, _)| *index);

        Ok(indexed_states.into_iter().map(|(_, state)| state).collect())
    }

    async fn enrich_worktree(
        &self,
        repository: Repository,
        working_tree: WorkingTree,
        canonical_session_name: String,
        has_session: bool,
    ) -> WorktreeState {
        let path = working_tree.path.clone();
        let (status_summary, ahead_behind, recent_commits, session_details) = tokio::join!(
            self.bounded("status", self.git_client.status(path.clone())),
            self.bounded("ahead_behind", self.git_client.ahead_behind(path.clone())),
            self.bounded("log", self.git_client.log(path.clone(), self.commit_count)),
            self.session_details(&canonical_session_name, has_session),
        );
        let (ahead_count, behind_count) = ahead_behind.unwrap_or_default();
        let (session_handle, process_names) = session_details;

        WorktreeState {
            ahead_count,
            behind_count,
            canonical_session_name,
            has_session,
            process_names,
            recent_commits: recent_commits.unwrap_or_default(),
            repository,
            session_handle,
            status_summary,
            working_tree,
        }
    }

    /// Reads handle and process list for a live session; an unknown handle
    /// degrades to a name-only one.
    async fn session_details(
        &self,
        session_name: &str,
        has_session: bool,
    ) -> (Option<SessionHandle>, Vec<String>) {
        if !has_session {
            return (None, Vec::new());
        }

        let (handle, process_names) = tokio::join!(
            self.bounded(
                "session_info",
                self.tmux_client.session_info(session_name.to_string())
            ),
            self.bounded(
                "running_processes",
                self.tmux_client.running_processes(session_name.to_string())
            ),
        );

        (
            Some(handle.unwrap_or_else(|| SessionHandle::named(session_name))),
            process_names.unwrap_or_default(),
        )
    }

    async fn assemble_snapshot(
        &self,
        worktrees: Vec<WorktreeState>,
        live_sessions: Vec<String>,
    ) -> Snapshot {
        let canonical_names: HashSet<&str> = worktrees
            .iter()
            .map(|state| state.canonical_session_name.as_str())
            .collect();
        let orphan_names: Vec<String> = live_sessions
            .iter()
            .filter(|name| !canonical_names.contains(name.as_str()))
            .cloned()
            .collect();

        let mut join_set = JoinSet::new();
        for (index, name) in orphan_names.into_iter().enumerate() {
            let reconciler = self.clone();
            join_set.spawn(async move {
                let (handle, process_names) = reconciler.session_details(&name, true).await;
                let handle = handle.unwrap_or_else(|| SessionHandle::named(name));

                (
                    index,
                    OrphanSession {
                        handle,
                        process_names,
                    },
                )
            });
        }
        let mut indexed_orphans = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(indexed_orphan) => indexed_orphans.push(indexed_orphan),
                Err(error) => warn!(%error, "Orphan enrichment task failed"),
            }
        }
        indexed_orphans.sort_by_key(|(index, _)| *index);
        let orphans: Vec<OrphanSession> = indexed_orphans
            .into_iter()
            .map(|(_, orphan)| orphan)
            .collect();

        let sessions = live_sessions
            .iter()
            .map(|name| {
                worktrees
                    .iter()
                    .filter_map(|state| state.session_handle.as_ref())
                    .chain(orphans.iter().map(|orphan| &orphan.handle))
                    .find(|handle| handle.name == *name)
                    .cloned()
                    .unwrap_or_else(|| SessionHandle::named(name.clone()))
            })
            .collect();

        Snapshot {
            orphans,
            sessions,
            worktrees,
        }
    }

    /// Awaits one enrichment call under the enrichment timeout, degrading
    /// failures to `None`.
    async fn bounded<T>(
        &self,
        label: &'static str,
        future: impl Future<Output = Result<T, String>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.enrichment_timeout, future).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(error)) => {
                debug!(call = label, %error, "Enrichment call failed");

                None
            }
            Err(_) => {
                debug!(call = label, "Enrichment call timed out");

                None
            }
        }
    }
}
