//! Background task helpers.
//!
//! Every task reports back through an [`AppEvent`]; none of them touch app
//! state directly.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::app::project::ProjectScope;
use crate::app::reconcile::{CreateOutcome, JumpOutcome, JumpTarget, ReconcileError};
use crate::app::service::AppServices;
use crate::app::AppEvent;
use crate::domain::repository::Repository;
use crate::infra::recent::JournalWrite;

/// Why a branch list was requested, carried back so the result can be
/// matched against the mode that asked for it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BranchPurpose {
    Adopt {
        repository: Repository,
        session_name: String,
    },
    Create {
        name: String,
        repository: Repository,
    },
}

/// A mutation dispatched from a menu or picker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operation {
    Adopt {
        base_branch: String,
        repository: Repository,
        session_name: String,
    },
    Create {
        base_branch: String,
        name: String,
        repository: Repository,
    },
    Delete {
        active_path: Option<PathBuf>,
        path: PathBuf,
        repository: Repository,
    },
    Jump(JumpTarget),
    KillSession(String),
}

/// Result of one [`Operation`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OperationOutcome {
    Adopted {
        repository: Repository,
        result: Result<PathBuf, ReconcileError>,
        session_name: String,
    },
    Created(Result<CreateOutcome, ReconcileError>),
    Deleted {
        path: PathBuf,
        result: Result<(), ReconcileError>,
    },
    Jumped(Result<JumpOutcome, ReconcileError>),
    Killed {
        name: String,
        result: Result<(), ReconcileError>,
    },
}

/// Stateless helpers that spawn backend work.
pub(crate) struct TaskService;

impl TaskService {
    /// Spawns one refresh of `scope` and emits
    /// [`AppEvent::RefreshCompleted`].
    pub(crate) fn spawn_refresh(services: &AppServices, scope: ProjectScope) {
        let reconciler = services.reconciler().clone();
        let event_tx = services.event_sender();
        debug!("Dispatching refresh");

        tokio::spawn(async move {
            let result = match &scope {
                ProjectScope::Single(repository) => reconciler.list(repository).await,
                ProjectScope::Cross(repositories) => reconciler.scan(repositories).await,
            };
            debug!(ok = result.is_ok(), "Refresh finished");

            let _ = event_tx.send(AppEvent::RefreshCompleted { result });
        });
    }

    /// Spawns a pane capture of `session_name` and emits
    /// [`AppEvent::PreviewCaptured`].
    pub(crate) fn spawn_preview(services: &AppServices, session_name: String) {
        let tmux_client = services.reconciler().tmux_client();
        let lines = services.preview_lines();
        let event_tx = services.event_sender();

        tokio::spawn(async move {
            let result = tmux_client.capture_pane(session_name.clone(), lines).await;

            let _ = event_tx.send(AppEvent::PreviewCaptured {
                result,
                session_name,
            });
        });
    }

    /// Spawns a branch listing and emits [`AppEvent::BranchesLoaded`].
    pub(crate) fn spawn_branch_load(services: &AppServices, purpose: BranchPurpose) {
        let reconciler = services.reconciler().clone();
        let event_tx = services.event_sender();

        tokio::spawn(async move {
            let repository = match &purpose {
                BranchPurpose::Adopt { repository, .. }
                | BranchPurpose::Create { repository, .. } => repository,
            };
            let result = reconciler.branches(repository).await;

            let _ = event_tx.send(AppEvent::BranchesLoaded { purpose, result });
        });
    }

    /// Spawns the recents journal write so file I/O stays off the control
    /// loop. Failures are only logged.
    pub(crate) fn spawn_journal_write(write: JournalWrite) {
        tokio::spawn(async move {
            if let Err(error) = write.persist().await {
                warn!(%error, "Failed to persist recents journal");
            }
        });
    }

    /// Spawns `operation` and emits [`AppEvent::OperationCompleted`].
    pub(crate) fn spawn_operation(services: &AppServices, operation: Operation) {
        let reconciler = services.reconciler().clone();
        let event_tx = services.event_sender();

        tokio::spawn(async move {
            let outcome = match operation {
                Operation::Adopt {
                    base_branch,
                    repository,
                    session_name,
                } => {
                    let result = reconciler
                        .adopt_orphan(&repository, &session_name, &base_branch)
                        .await;

                    OperationOutcome::Adopted {
                        repository,
                        result,
                        session_name,
                    }
                }
                Operation::Create {
                    base_branch,
                    name,
                    repository,
                } => OperationOutcome::Created(
                    reconciler
                        .create_worktree(&repository, &name, &base_branch)
                        .await,
                ),
                Operation::Delete {
                    active_path,
                    path,
                    repository,
                } => {
                    let result = reconciler
                        .delete_worktree(&repository, &path, active_path.as_deref())
                        .await;

                    OperationOutcome::Deleted { path, result }
                }
                Operation::Jump(target) => OperationOutcome::Jumped(reconciler.jump(target).await),
                Operation::KillSession(name) => {
                    let result = reconciler.kill_session(&name).await;

                    OperationOutcome::Killed { name, result }
                }
            };

            let _ = event_tx.send(AppEvent::OperationCompleted { outcome });
        });
    }
}
