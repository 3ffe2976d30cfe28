//! App-layer composition root and shared state container.
//!
//! This module wires app submodules and exposes [`App`], the single owner of
//! every piece of state the runtime mode handlers and the renderer read.

use std::path::PathBuf;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{Config, LandingView};
use crate::domain::panel::{GridPanel, PanelSet, SelectionKey};
use crate::domain::repository::Repository;
use crate::domain::worktree::Snapshot;
use crate::infra::recent::{RecentJournal, RecentVisit};
use crate::ui::state::app_mode::{AppMode, MenuAction, MenuTarget, RepositoryPurpose, View};
use crate::ui::RenderContext;
use crate::ui::state::picker::BranchPicker;
use crate::ui::style::Theme;

pub mod grid;
pub mod list;
pub mod notification;
pub mod project;
pub mod reconcile;
mod service;
pub(crate) mod task;

use self::grid::GridState;
use self::grid::cursor::Slot;
use self::list::{ListItem, WorktreeList};
use self::notification::Notification;
use self::project::ProjectManager;
use self::reconcile::{
    JumpTarget, ReconcileError, Reconciler, adoption_path, validate_worktree_name, worktree_path,
};
pub use self::service::AppServices;
use self::task::{BranchPurpose, Operation, OperationOutcome, TaskService};

/// Internal app events emitted by background tasks.
///
/// Producers should emit events only; state mutation is centralized in
/// [`App::apply_app_events`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum AppEvent {
    /// A branch listing requested by the create or adopt flow finished.
    BranchesLoaded {
        purpose: BranchPurpose,
        result: Result<Vec<String>, ReconcileError>,
    },
    /// A create, delete, adopt, kill, or jump finished.
    OperationCompleted { outcome: OperationOutcome },
    /// A pane capture for the preview finished.
    PreviewCaptured {
        result: Result<String, String>,
        session_name: String,
    },
    /// A list or scan finished.
    RefreshCompleted {
        result: Result<Snapshot, ReconcileError>,
    },
}

/// Captured pane output of one session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Preview {
    pub content: String,
    pub session_name: String,
}

/// Stores application state and coordinates worktree/session workflows.
pub struct App {
    pub mode: AppMode,
    pub(crate) grid: GridState,
    pub(crate) list: WorktreeList,
    pub(crate) projects: ProjectManager,
    pub(crate) services: AppServices,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    journal: RecentJournal,
    notification: Option<Notification>,
    preview: Option<Preview>,
    preview_in_flight: bool,
    refresh_error: Option<String>,
    refresh_in_flight: usize,
    refresh_queued: bool,
    snapshot: Snapshot,
}

impl App {
    /// Resolves the project scope for `working_dir` and builds the app.
    pub async fn new(
        config: &Config,
        reconciler: Reconciler,
        journal: RecentJournal,
        working_dir: PathBuf,
    ) -> Self {
        let projects = ProjectManager::discover(
            reconciler.git_client(),
            working_dir,
            &config.projects,
            journal.projects(),
        )
        .await;

        Self::from_parts(config, reconciler, projects, journal)
    }

    /// Builds the app from already resolved parts.
    pub(crate) fn from_parts(
        config: &Config,
        reconciler: Reconciler,
        projects: ProjectManager,
        journal: RecentJournal,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mode = match config.landing_view {
            LandingView::Grid => AppMode::GridView,
            LandingView::List => AppMode::Main,
        };

        Self {
            mode,
            grid: GridState::default(),
            list: WorktreeList::default(),
            projects,
            services: AppServices::new(event_tx, config.preview_lines, reconciler),
            event_rx,
            journal,
            notification: None,
            preview: None,
            preview_in_flight: false,
            refresh_error: None,
            refresh_in_flight: 0,
            refresh_queued: false,
            snapshot: Snapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Returns the notification while it has not expired.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification
            .as_ref()
            .filter(|notification| !notification.is_expired_at(Instant::now()))
    }

    /// Returns the preview when it belongs to the current selection.
    pub fn preview(&self) -> Option<&Preview> {
        let session_name = self.selected_session_name()?;

        self.preview
            .as_ref()
            .filter(|preview| preview.session_name == session_name)
    }

    /// Returns the error of the latest failed refresh, cleared by the next
    /// successful one.
    pub fn refresh_error(&self) -> Option<&str> {
        self.refresh_error.as_deref()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_in_flight > 0
    }

    /// Borrows everything one frame draws.
    pub(crate) fn render_context(&mut self) -> RenderContext<'_> {
        let session_name = self.selected_session_name();
        let now = Instant::now();

        RenderContext {
            grid: &mut self.grid,
            is_refreshing: self.refresh_in_flight > 0,
            list: &mut self.list,
            mode: &self.mode,
            notification: self
                .notification
                .as_ref()
                .filter(|notification| !notification.is_expired_at(now)),
            preview: self
                .preview
                .as_ref()
                .filter(|preview| session_name.as_ref() == Some(&preview.session_name)),
            project_label: self.projects.label(),
            refresh_error: self.refresh_error.as_deref(),
            snapshot: &self.snapshot,
            theme: Theme::DEFAULT,
            working_dir: self.projects.working_dir(),
        }
    }

    /// Dispatches a refresh unless one is already in flight.
    ///
    /// Returns whether a refresh was dispatched.
    pub(crate) fn request_refresh(&mut self) -> bool {
        if self.refresh_in_flight > 0 {
            return false;
        }

        self.refresh_in_flight += 1;
        TaskService::spawn_refresh(&self.services, self.projects.scope().clone());

        true
    }

    /// Dispatches a preview capture for the selected session.
    pub(crate) fn request_preview(&mut self) {
        let Some(session_name) = self.selected_session_name() else {
            self.preview = None;

            return;
        };
        if self.preview_in_flight {
            return;
        }

        self.preview_in_flight = true;
        TaskService::spawn_preview(&self.services, session_name);
    }

    /// Returns the live session behind the current selection.
    pub(crate) fn selected_session_name(&self) -> Option<String> {
        match self.mode.view() {
            View::Main => self
                .list
                .selected()
                .and_then(|item| item.live_session_name(&self.snapshot)),
            View::Grid | View::GridDetail => self
                .grid
                .selected_panel()
                .filter(|panel| panel.has_session)
                .map(|panel| panel.session_name.clone()),
        }
    }

    pub(crate) fn notify_info(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::info(message));
    }

    pub(crate) fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::error(message));
    }

    /// Switches between the list and the grid.
    pub(crate) fn toggle_view(&mut self) {
        self.mode = match self.mode.view() {
            View::Main => AppMode::GridView,
            View::Grid | View::GridDetail => AppMode::Main,
        };
    }

    /// Acts on the grid selection: sentinels run their action, panels open
    /// the detail view.
    pub(crate) fn activate_grid_selection(&mut self) {
        match self.grid.selected_slot() {
            Slot::NewWorktree => self.start_create(View::Grid),
            Slot::ListView => self.mode = AppMode::Main,
            Slot::Panel(_) | Slot::Available(_) => {
                if self.grid.selected_panel().is_some() {
                    self.mode = AppMode::GridDetail;
                }
            }
        }
    }

    /// Starts the create flow, asking for a repository first in
    /// cross-project mode.
    pub(crate) fn start_create(&mut self, return_view: View) {
        if let Some(repository) = self.projects.repository().cloned() {
            self.mode = AppMode::CreateName {
                input: String::new(),
                is_loading: false,
                repository,
                return_view,
            };

            return;
        }

        let repositories = self.projects.repositories();
        if repositories.is_empty() {
            self.notify_error("No projects found; add `projects` to the config");

            return;
        }

        self.mode = AppMode::SelectRepository {
            purpose: RepositoryPurpose::Create,
            repositories,
            return_view,
            selected_index: 0,
        };
    }

    /// Continues the flow that opened the repository picker with the
    /// highlighted repository.
    pub(crate) fn choose_repository(&mut self) {
        let AppMode::SelectRepository {
            purpose,
            repositories,
            return_view,
            selected_index,
        } = &self.mode
        else {
            return;
        };
        let Some(repository) = repositories.get(*selected_index).cloned() else {
            return;
        };
        let (purpose, return_view) = (purpose.clone(), *return_view);

        match purpose {
            RepositoryPurpose::Create => {
                self.mode = AppMode::CreateName {
                    input: String::new(),
                    is_loading: false,
                    repository,
                    return_view,
                };
            }
            RepositoryPurpose::Adopt { session_name } => {
                self.begin_adopt(repository, session_name, return_view);
            }
        }
    }

    /// Validates the typed worktree name and loads branches for it.
    pub(crate) fn submit_create_name(&mut self) {
        let validation = match &self.mode {
            AppMode::CreateName {
                input,
                is_loading: false,
                repository,
                ..
            } => validate_worktree_name(input).map(|()| (input.clone(), repository.clone())),
            _ => return,
        };

        match validation {
            Ok((name, repository)) => {
                if let AppMode::CreateName { is_loading, .. } = &mut self.mode {
                    *is_loading = true;
                }
                TaskService::spawn_branch_load(
                    &self.services,
                    BranchPurpose::Create { name, repository },
                );
            }
            Err(error) => self.notify_error(error.to_string()),
        }
    }

    /// Dispatches the create for the picked base branch and returns to the
    /// previous view.
    pub(crate) fn confirm_create_branch(&mut self) {
        let AppMode::CreateBranch {
            name,
            picker,
            repository,
            return_view,
        } = &self.mode
        else {
            return;
        };
        let base_branch = picker.selected().map(str::to_string);
        let (name, repository, return_view) = (name.clone(), repository.clone(), *return_view);
        let Some(base_branch) = base_branch else {
            self.notify_error("No base branch selected");

            return;
        };

        let path = worktree_path(self.services.reconciler().layout(), &repository, &name);
        self.set_pending_key(SelectionKey::Path(path));
        self.mode = return_view.restore_mode();
        self.notify_info(format!("Creating `{name}` from `{base_branch}`"));
        TaskService::spawn_operation(
            &self.services,
            Operation::Create {
                base_branch,
                name,
                repository,
            },
        );
    }

    /// Starts adopting the orphan `session_name`, asking for a repository
    /// first in cross-project mode.
    pub(crate) fn start_adopt(&mut self, session_name: String, return_view: View) {
        if let Some(repository) = self.projects.repository().cloned() {
            self.begin_adopt(repository, session_name, return_view);

            return;
        }

        let repositories = self.projects.repositories();
        if repositories.is_empty() {
            self.notify_error("No projects found to adopt into");

            return;
        }

        self.mode = AppMode::SelectRepository {
            purpose: RepositoryPurpose::Adopt { session_name },
            repositories,
            return_view,
            selected_index: 0,
        };
    }

    /// Dispatches the adoption for the picked base branch and returns to the
    /// previous view.
    pub(crate) fn confirm_orphan_branch(&mut self) {
        let AppMode::OrphanBranch {
            picker,
            repository,
            return_view,
            session_name,
        } = &self.mode
        else {
            return;
        };
        let base_branch = picker.selected().map(str::to_string);
        let (repository, return_view, session_name) =
            (repository.clone(), *return_view, session_name.clone());
        let Some(base_branch) = base_branch else {
            self.notify_error("No base branch selected");

            return;
        };

        let path = adoption_path(self.services.reconciler().layout(), &repository, &session_name);
        self.set_pending_key(SelectionKey::Path(path));
        self.mode = return_view.restore_mode();
        self.notify_info(format!("Adopting `{session_name}`"));
        TaskService::spawn_operation(
            &self.services,
            Operation::Adopt {
                base_branch,
                repository,
                session_name,
            },
        );
    }

    /// Opens the action menu for the selection of `return_view`.
    pub(crate) fn open_menu(&mut self, return_view: View) {
        let mode = match return_view {
            View::Main => self
                .list
                .selected()
                .map(|item| self.list_item_menu(item, return_view)),
            View::Grid | View::GridDetail => self
                .grid
                .selected_panel()
                .and_then(|panel| self.panel_menu(panel, return_view)),
        };

        if let Some(mode) = mode {
            self.mode = mode;
        }
    }

    /// Runs the highlighted worktree menu action after checking its
    /// precondition locally.
    pub(crate) fn run_menu_action(&mut self) {
        let AppMode::ActionMenu {
            return_view,
            selected_index,
            target,
        } = &self.mode
        else {
            return;
        };
        let Some(action) = target.actions().get(*selected_index).copied() else {
            return;
        };
        let (return_view, target) = (*return_view, target.clone());

        let operation = match (action, target) {
            (MenuAction::Jump, MenuTarget::Worktree(state)) => {
                Operation::Jump(JumpTarget::Worktree {
                    path: state.working_tree.path,
                    repository: state.repository,
                })
            }
            (MenuAction::Jump, MenuTarget::Recent { entry, .. }) => {
                Operation::Jump(JumpTarget::Session {
                    name: entry.session_name.clone(),
                    path: Some(entry.path.clone()),
                    visit: Some(RecentVisit::from(&entry)),
                })
            }
            (MenuAction::Delete, MenuTarget::Worktree(state)) => {
                if state.is_main() {
                    self.notify_error("Cannot delete the main worktree");

                    return;
                }
                let active_path = self.projects.active_worktree().map(PathBuf::from);
                if active_path.as_deref() == Some(state.working_tree.path.as_path()) {
                    self.notify_error("Cannot delete the worktree you are working in");

                    return;
                }

                Operation::Delete {
                    active_path,
                    path: state.working_tree.path,
                    repository: state.repository,
                }
            }
            (MenuAction::KillSession, target) => {
                let name = match target {
                    MenuTarget::Recent { entry, .. } => entry.session_name,
                    MenuTarget::Worktree(state) => state.canonical_session_name,
                };
                if !self.snapshot.has_live_session(&name) {
                    self.notify_error(format!("Session `{name}` is not running"));

                    return;
                }

                Operation::KillSession(name)
            }
            _ => return,
        };

        self.mode = return_view.restore_mode();
        TaskService::spawn_operation(&self.services, operation);
    }

    /// Runs the highlighted orphan menu action.
    pub(crate) fn run_orphan_action(&mut self) {
        let AppMode::OrphanMenu {
            return_view,
            selected_index,
            session_name,
        } = &self.mode
        else {
            return;
        };
        let Some(action) = MenuAction::ORPHAN.get(*selected_index).copied() else {
            return;
        };
        let (return_view, session_name) = (*return_view, session_name.clone());

        if action == MenuAction::Adopt {
            self.start_adopt(session_name, return_view);

            return;
        }
        if !self.snapshot.has_live_session(&session_name) {
            self.notify_error(format!("Session `{session_name}` is not running"));

            return;
        }

        let operation = match action {
            MenuAction::Jump => Operation::Jump(JumpTarget::Session {
                name: session_name,
                path: None,
                visit: None,
            }),
            MenuAction::KillSession => Operation::KillSession(session_name),
            MenuAction::Adopt | MenuAction::Delete => return,
        };

        self.mode = return_view.restore_mode();
        TaskService::spawn_operation(&self.services, operation);
    }

    /// Applies one or more queued app events, strictly in delivery order.
    pub(crate) fn apply_app_events(&mut self, first_event: AppEvent) {
        for event in self.drain_app_events(first_event) {
            self.apply_app_event(event);
        }
    }

    /// Waits for the next internal app event.
    pub(crate) async fn next_app_event(&mut self) -> Option<AppEvent> {
        self.event_rx.recv().await
    }

    fn drain_app_events(&mut self, first_event: AppEvent) -> Vec<AppEvent> {
        let mut events = vec![first_event];
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }

        events
    }

    fn apply_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::BranchesLoaded { purpose, result } => {
                self.apply_branches_loaded(purpose, result);
            }
            AppEvent::OperationCompleted { outcome } => self.apply_operation_outcome(outcome),
            AppEvent::PreviewCaptured {
                result,
                session_name,
            } => self.apply_preview(session_name, result),
            AppEvent::RefreshCompleted { result } => self.apply_refresh(result),
        }
    }

    fn apply_refresh(&mut self, result: Result<Snapshot, ReconcileError>) {
        self.refresh_in_flight = self.refresh_in_flight.saturating_sub(1);

        match result {
            Ok(snapshot) => {
                debug!(
                    worktrees = snapshot.worktrees.len(),
                    orphans = snapshot.orphans.len(),
                    "Applying refresh"
                );
                self.refresh_error = None;
                self.snapshot = snapshot;
                self.rebuild_views();
            }
            Err(error) => {
                warn!(%error, "Refresh failed");
                let message = error.to_string();
                if self.refresh_error.is_none() {
                    self.notify_error(format!("Refresh failed: {message}"));
                }
                self.refresh_error = Some(message);
            }
        }

        if self.refresh_queued && self.request_refresh() {
            self.refresh_queued = false;
        }
    }

    fn apply_preview(&mut self, session_name: String, result: Result<String, String>) {
        self.preview_in_flight = false;
        if self.selected_session_name().as_deref() != Some(session_name.as_str()) {
            return;
        }

        match result {
            Ok(content) => {
                self.preview = Some(Preview {
                    content,
                    session_name,
                });
            }
            Err(error) => {
                debug!(session = %session_name, %error, "Preview capture failed");
                self.preview = None;
            }
        }
    }

    fn apply_branches_loaded(
        &mut self,
        purpose: BranchPurpose,
        result: Result<Vec<String>, ReconcileError>,
    ) {
        match purpose {
            BranchPurpose::Create { name, repository } => {
                let AppMode::CreateName {
                    input,
                    is_loading: true,
                    repository: mode_repository,
                    return_view,
                } = &self.mode
                else {
                    return;
                };
                if *input != name || *mode_repository != repository {
                    return;
                }
                let return_view = *return_view;

                match result {
                    Ok(branches) => {
                        self.mode = AppMode::CreateBranch {
                            name,
                            picker: BranchPicker::loaded(branches),
                            repository,
                            return_view,
                        };
                    }
                    Err(error) => {
                        if let AppMode::CreateName { is_loading, .. } = &mut self.mode {
                            *is_loading = false;
                        }
                        self.notify_error(error.to_string());
                    }
                }
            }
            BranchPurpose::Adopt {
                repository,
                session_name,
            } => {
                let AppMode::OrphanBranch {
                    picker,
                    repository: mode_repository,
                    return_view,
                    session_name: mode_session_name,
                } = &mut self.mode
                else {
                    return;
                };
                if !picker.is_loading
                    || *mode_repository != repository
                    || *mode_session_name != session_name
                {
                    return;
                }
                let return_view = *return_view;

                match result {
                    Ok(branches) => *picker = BranchPicker::loaded(branches),
                    Err(error) => {
                        self.mode = return_view.restore_mode();
                        self.notify_error(error.to_string());
                    }
                }
            }
        }
    }

    fn apply_operation_outcome(&mut self, outcome: OperationOutcome) {
        info!(?outcome, "Operation completed");

        match outcome {
            OperationOutcome::Adopted {
                repository,
                result,
                session_name,
            } => match result {
                Ok(path) => {
                    self.record_visit(RecentVisit {
                        path: path.clone(),
                        repo_name: repository.name,
                        repo_root: repository.root,
                        session_name: session_name.clone(),
                        worktree: crate::domain::repository::path_basename(&path),
                    });
                    self.notify_info(format!("Adopted `{session_name}` into {}", path.display()));
                }
                Err(error) => self.fail_with_pending(&error),
            },
            OperationOutcome::Created(result) => match result {
                Ok(created) => match created.session_error {
                    Some(error) => self.notify_error(format!(
                        "Created {} but its session failed to start: {error}",
                        created.path.display()
                    )),
                    None => self.notify_info(format!("Created {}", created.path.display())),
                },
                Err(error) => self.fail_with_pending(&error),
            },
            OperationOutcome::Deleted { path, result } => match result {
                Ok(()) => self.notify_info(format!("Deleted {}", path.display())),
                Err(error) => self.fail(&error),
            },
            OperationOutcome::Jumped(result) => match result {
                Ok(jumped) => {
                    if let Some(visit) = jumped.visit {
                        self.record_visit(visit);
                    }
                    let message = match jumped.renamed_from {
                        Some(old_name) => format!(
                            "Renamed `{old_name}` to `{}` and switched",
                            jumped.session_name
                        ),
                        None => format!("Switched to `{}`", jumped.session_name),
                    };
                    self.notify_info(message);
                }
                Err(error) => self.fail(&error),
            },
            OperationOutcome::Killed { name, result } => match result {
                Ok(()) => self.notify_info(format!("Killed session `{name}`")),
                Err(error) => self.fail(&error),
            },
        }

        if !self.request_refresh() {
            self.refresh_queued = true;
        }
    }

    fn fail(&mut self, error: &ReconcileError) {
        warn!(%error, "Operation failed");
        self.notify_error(error.to_string());
    }

    fn fail_with_pending(&mut self, error: &ReconcileError) {
        self.list.clear_pending_key();
        self.grid.clear_pending_key();
        self.fail(error);
    }

    fn set_pending_key(&mut self, key: SelectionKey) {
        self.list.set_pending_key(key.clone());
        self.grid.set_pending_key(key);
    }

    fn record_visit(&mut self, visit: RecentVisit) {
        match self.journal.add(visit) {
            Ok(write) => TaskService::spawn_journal_write(write),
            Err(error) => warn!(%error, "Failed to record recent visit"),
        }
        self.rebuild_views();
    }

    fn rebuild_views(&mut self) {
        let recent_entries = self.journal.other_projects(self.projects.current_root());
        self.list
            .set_items(list::build_items(&self.snapshot, &recent_entries));
        self.grid
            .set_panels(PanelSet::build(&self.snapshot, &recent_entries));

        if matches!(self.mode, AppMode::GridDetail) && self.grid.selected_panel().is_none() {
            self.mode = AppMode::GridView;
        }
    }

    fn begin_adopt(&mut self, repository: Repository, session_name: String, return_view: View) {
        self.mode = AppMode::OrphanBranch {
            picker: BranchPicker::loading(),
            repository: repository.clone(),
            return_view,
            session_name: session_name.clone(),
        };
        TaskService::spawn_branch_load(
            &self.services,
            BranchPurpose::Adopt {
                repository,
                session_name,
            },
        );
    }

    fn list_item_menu(&self, item: &ListItem, return_view: View) -> AppMode {
        match item {
            ListItem::Orphan(orphan) => AppMode::OrphanMenu {
                return_view,
                selected_index: 0,
                session_name: orphan.name().to_string(),
            },
            ListItem::Recent(entry) => AppMode::ActionMenu {
                return_view,
                selected_index: 0,
                target: MenuTarget::Recent {
                    entry: entry.clone(),
                    has_session: self.snapshot.has_live_session(&entry.session_name),
                },
            },
            ListItem::Worktree(state) => AppMode::ActionMenu {
                return_view,
                selected_index: 0,
                target: MenuTarget::Worktree(state.clone()),
            },
        }
    }

    fn panel_menu(&self, panel: &GridPanel, return_view: View) -> Option<AppMode> {
        if panel.is_orphan {
            return Some(AppMode::OrphanMenu {
                return_view,
                selected_index: 0,
                session_name: panel.session_name.clone(),
            });
        }

        let target = if panel.is_recent {
            let entry = self
                .journal
                .entries()
                .iter()
                .find(|entry| entry.path == panel.path)?;

            MenuTarget::Recent {
                entry: entry.clone(),
                has_session: panel.has_session,
            }
        } else {
            MenuTarget::Worktree(self.snapshot.worktree_by_path(&panel.path)?.clone())
        };

        Some(AppMode::ActionMenu {
            return_view,
            selected_index: 0,
            target,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{load_snapshot, new_idle_app, repository, sample_snapshot};
    use std::time::Duration;
    use super::*;
    use crate::app::notification::NotificationLevel;
    use crate::app::reconcile::{CreateOutcome, JumpOutcome};

    #[tokio::test]
    async fn test_request_refresh_allows_one_in_flight() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();

        // Act
        let first = app.request_refresh();
        let second = app.request_refresh();

        // Assert
        assert!(first);
        assert!(!second);
        assert!(app.is_refreshing());
    }

    #[tokio::test]
    async fn test_refresh_completion_decrements_once_and_saturates() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.refresh_in_flight = 1;

        // Act
        app.apply_app_events(AppEvent::RefreshCompleted {
            result: Err(ReconcileError::BackendUnavailable("git exploded".to_string())),
        });
        app.apply_app_events(AppEvent::RefreshCompleted {
            result: Ok(Snapshot::default()),
        });

        // Assert
        assert_eq!(app.refresh_in_flight, 0);
        assert_eq!(app.refresh_error(), None);
    }

    #[tokio::test]
    async fn test_refresh_failure_notifies_once_until_recovery() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        let failure = || AppEvent::RefreshCompleted {
            result: Err(ReconcileError::BackendUnavailable("tmux gone".to_string())),
        };

        // Act
        app.apply_app_events(failure());
        let first = app.notification().map(|notification| notification.message.clone());
        app.notification = None;
        app.apply_app_events(failure());
        let repeated = app.notification().cloned();
        app.apply_app_events(AppEvent::RefreshCompleted {
            result: Ok(Snapshot::default()),
        });
        app.apply_app_events(failure());
        let after_recovery = app.notification().is_some();

        // Assert
        assert!(first.is_some_and(|message| message.starts_with("Refresh failed:")));
        assert_eq!(repeated, None);
        assert!(after_recovery);
        assert!(app.refresh_error().is_some());
    }

    #[tokio::test]
    async fn test_refresh_builds_list_and_grid() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();

        // Act
        load_snapshot(&mut app, sample_snapshot());

        // Assert
        let names: Vec<&str> = app.list.items().iter().map(ListItem::display_name).collect();
        assert_eq!(names, vec!["app", "app-login", "scratch"]);
        assert_eq!(app.grid.visible_sessions().len(), 2);
        assert_eq!(app.grid.visible_available().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_preview_is_discarded() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        load_snapshot(&mut app, sample_snapshot());
        app.list.next();

        // Act
        app.apply_app_events(AppEvent::PreviewCaptured {
            result: Ok("old output".to_string()),
            session_name: "scratch".to_string(),
        });
        let stale = app.preview().cloned();
        app.apply_app_events(AppEvent::PreviewCaptured {
            result: Ok("$ cargo test".to_string()),
            session_name: "app-login".to_string(),
        });

        // Assert
        assert_eq!(stale, None);
        assert_eq!(
            app.preview().map(|preview| preview.content.as_str()),
            Some("$ cargo test")
        );
    }

    #[tokio::test]
    async fn test_branches_loaded_moves_create_name_to_branch_picker() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::CreateName {
            input: "login".to_string(),
            is_loading: true,
            repository: repository(),
            return_view: View::Grid,
        };

        // Act
        app.apply_app_events(AppEvent::BranchesLoaded {
            purpose: BranchPurpose::Create {
                name: "login".to_string(),
                repository: repository(),
            },
            result: Ok(vec!["main".to_string(), "dev".to_string()]),
        });

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::CreateBranch {
                ref name,
                ref picker,
                return_view: View::Grid,
                ..
            } if name == "login" && picker.branches.len() == 2
        ));
    }

    #[tokio::test]
    async fn test_branches_loaded_for_abandoned_flow_is_ignored() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();

        // Act
        app.apply_app_events(AppEvent::BranchesLoaded {
            purpose: BranchPurpose::Create {
                name: "login".to_string(),
                repository: repository(),
            },
            result: Ok(vec!["main".to_string()]),
        });

        // Assert
        assert!(matches!(app.mode, AppMode::Main));
    }

    #[tokio::test]
    async fn test_submit_create_name_rejects_invalid_name_locally() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::CreateName {
            input: "two words".to_string(),
            is_loading: false,
            repository: repository(),
            return_view: View::Main,
        };

        // Act
        app.submit_create_name();

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::CreateName {
                is_loading: false,
                ..
            }
        ));
        assert_eq!(
            app.notification().map(|notification| notification.level),
            Some(NotificationLevel::Error)
        );
    }

    #[tokio::test]
    async fn test_confirm_create_branch_selects_new_worktree_after_refresh() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        load_snapshot(&mut app, sample_snapshot());
        app.mode = AppMode::CreateBranch {
            name: "new".to_string(),
            picker: BranchPicker::loaded(vec!["main".to_string()]),
            repository: repository(),
            return_view: View::Main,
        };

        // Act
        app.confirm_create_branch();
        let mut snapshot = sample_snapshot();
        snapshot
            .worktrees
            .push(test_support::worktree_state("/src/app-new", false));
        load_snapshot(&mut app, snapshot);

        // Assert
        assert!(matches!(app.mode, AppMode::Main));
        assert_eq!(
            app.list.selected().map(ListItem::display_name),
            Some("app-new")
        );
    }

    #[tokio::test]
    async fn test_failed_create_reports_error_and_drops_pending_selection() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        load_snapshot(&mut app, sample_snapshot());
        app.set_pending_key(SelectionKey::Path(PathBuf::from("/src/app-new")));
        app.refresh_in_flight = 1;

        // Act
        app.apply_app_events(AppEvent::OperationCompleted {
            outcome: OperationOutcome::Created(Err(ReconcileError::PreconditionViolation(
                "Path already exists".to_string(),
            ))),
        });
        let mut snapshot = sample_snapshot();
        snapshot
            .worktrees
            .push(test_support::worktree_state("/src/app-new", false));
        load_snapshot(&mut app, snapshot);

        // Assert
        assert_eq!(app.list.selected().map(ListItem::display_name), Some("app"));
        assert_eq!(
            app.notification().map(|notification| notification.message.as_str()),
            Some("Path already exists")
        );
    }

    #[tokio::test]
    async fn test_operation_completion_queues_refresh_while_one_is_in_flight() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.refresh_in_flight = 1;

        // Act
        app.apply_app_events(AppEvent::OperationCompleted {
            outcome: OperationOutcome::Created(Ok(CreateOutcome {
                path: PathBuf::from("/src/app-new"),
                session_error: None,
                session_name: "app-new".to_string(),
            })),
        });
        let queued = app.refresh_queued;
        app.apply_app_events(AppEvent::RefreshCompleted {
            result: Ok(Snapshot::default()),
        });

        // Assert
        assert!(queued);
        assert!(!app.refresh_queued);
        assert_eq!(app.refresh_in_flight, 1);
    }

    #[tokio::test]
    async fn test_recorded_visit_is_written_in_background() {
        // Arrange
        let (mut app, journal_dir) = new_idle_app();
        app.refresh_in_flight = 1;
        let visit = RecentVisit {
            path: PathBuf::from("/src/app-login"),
            repo_name: "app".to_string(),
            repo_root: PathBuf::from("/src/app"),
            session_name: "app-login".to_string(),
            worktree: "app-login".to_string(),
        };

        // Act
        app.apply_app_events(AppEvent::OperationCompleted {
            outcome: OperationOutcome::Jumped(Ok(JumpOutcome {
                created: false,
                renamed_from: None,
                session_name: "app-login".to_string(),
                visit: Some(visit),
            })),
        });
        let written = tokio::time::timeout(Duration::from_secs(5), async {
            while RecentJournal::load(journal_dir.path(), 20).entries().is_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;

        // Assert
        assert!(written.is_ok());
        assert_eq!(app.journal.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_successful_jump_records_visit() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.refresh_in_flight = 1;
        let visit = RecentVisit {
            path: PathBuf::from("/src/app-login"),
            repo_name: "app".to_string(),
            repo_root: PathBuf::from("/src/app"),
            session_name: "app-login".to_string(),
            worktree: "app-login".to_string(),
        };

        // Act
        app.apply_app_events(AppEvent::OperationCompleted {
            outcome: OperationOutcome::Jumped(Ok(JumpOutcome {
                created: false,
                renamed_from: Some("app-login-old".to_string()),
                session_name: "app-login".to_string(),
                visit: Some(visit),
            })),
        });

        // Assert
        assert_eq!(app.journal.entries().len(), 1);
        assert_eq!(
            app.notification().map(|notification| notification.message.as_str()),
            Some("Renamed `app-login-old` to `app-login` and switched")
        );
    }

    #[tokio::test]
    async fn test_delete_of_main_worktree_is_refused_locally() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        load_snapshot(&mut app, sample_snapshot());
        app.mode = AppMode::ActionMenu {
            return_view: View::Main,
            selected_index: 1,
            target: MenuTarget::Worktree(test_support::worktree_state("/src/app", false)),
        };

        // Act
        app.run_menu_action();

        // Assert
        assert!(matches!(app.mode, AppMode::ActionMenu { .. }));
        assert_eq!(
            app.notification().map(|notification| notification.message.as_str()),
            Some("Cannot delete the main worktree")
        );
    }

    #[tokio::test]
    async fn test_start_create_without_projects_stays_put() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.projects = ProjectManager::cross(Vec::new(), PathBuf::from("/home/dev"));
        app.mode = AppMode::GridView;

        // Act
        app.start_create(View::Grid);

        // Assert
        assert!(matches!(app.mode, AppMode::GridView));
        assert_eq!(
            app.notification().map(|notification| notification.level),
            Some(NotificationLevel::Error)
        );
    }

    #[tokio::test]
    async fn test_start_create_in_cross_project_mode_asks_for_repository() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.projects = ProjectManager::cross(vec![repository()], PathBuf::from("/home/dev"));

        // Act
        app.start_create(View::Main);
        app.choose_repository();

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::CreateName {
                ref repository,
                return_view: View::Main,
                ..
            } if repository.name == "app"
        ));
    }

    #[tokio::test]
    async fn test_open_menu_for_orphan_row_opens_orphan_menu() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        load_snapshot(&mut app, sample_snapshot());
        app.list.previous();

        // Act
        app.open_menu(View::Main);

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::OrphanMenu { ref session_name, .. } if session_name == "scratch"
        ));
    }

    #[tokio::test]
    async fn test_grid_detail_falls_back_when_panel_vanishes() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::GridView;
        load_snapshot(&mut app, sample_snapshot());
        app.grid.quick_select(1);
        app.activate_grid_selection();
        let opened_detail = matches!(app.mode, AppMode::GridDetail);

        // Act
        load_snapshot(&mut app, Snapshot::default());

        // Assert
        assert!(opened_detail);
        assert!(matches!(app.mode, AppMode::GridView));
    }
}
