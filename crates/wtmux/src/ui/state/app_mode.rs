use crate::domain::recent::RecentEntry;
use crate::domain::repository::Repository;
use crate::domain::worktree::WorktreeState;

use super::palette::PaletteFocus;
use super::picker::BranchPicker;

pub enum AppMode {
    Main,
    GridView,
    GridDetail,
    SelectRepository {
        purpose: RepositoryPurpose,
        repositories: Vec<Repository>,
        return_view: View,
        selected_index: usize,
    },
    CreateName {
        input: String,
        is_loading: bool,
        repository: Repository,
        return_view: View,
    },
    CreateBranch {
        name: String,
        picker: BranchPicker,
        repository: Repository,
        return_view: View,
    },
    OrphanBranch {
        picker: BranchPicker,
        repository: Repository,
        return_view: View,
        session_name: String,
    },
    ActionMenu {
        return_view: View,
        selected_index: usize,
        target: MenuTarget,
    },
    OrphanMenu {
        return_view: View,
        selected_index: usize,
        session_name: String,
    },
    CommandPalette {
        focus: PaletteFocus,
        input: String,
        return_view: View,
        selected_index: usize,
    },
    Help {
        scroll_offset: u16,
        view: View,
    },
}

impl AppMode {
    /// Returns the view drawn underneath this mode.
    pub fn view(&self) -> View {
        match self {
            AppMode::Main => View::Main,
            AppMode::GridView => View::Grid,
            AppMode::GridDetail => View::GridDetail,
            AppMode::SelectRepository { return_view, .. }
            | AppMode::CreateName { return_view, .. }
            | AppMode::CreateBranch { return_view, .. }
            | AppMode::OrphanBranch { return_view, .. }
            | AppMode::ActionMenu { return_view, .. }
            | AppMode::OrphanMenu { return_view, .. }
            | AppMode::CommandPalette { return_view, .. } => *return_view,
            AppMode::Help { view, .. } => *view,
        }
    }
}

/// One of the three full-screen views; every overlay returns to one.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum View {
    #[default]
    Main,
    Grid,
    GridDetail,
}

impl View {
    /// Returns the keybinding pairs `(key, description)` for this view.
    pub fn keybindings(self) -> &'static [(&'static str, &'static str)] {
        match self {
            View::Main => &[
                ("q", "Quit"),
                ("j / k", "Move selection"),
                ("Enter", "Actions"),
                ("n", "New worktree"),
                ("r", "Refresh"),
                ("g", "Grid view"),
                ("/", "Command palette"),
                ("?", "Help"),
            ],
            View::Grid => &[
                ("q", "Quit"),
                ("Arrows / hjkl", "Move"),
                ("Tab / S-Tab", "Next / previous"),
                ("1-9", "Quick select"),
                ("Enter", "Open"),
                ("/", "Filter"),
                ("Esc", "Clear filter"),
                ("n", "New worktree"),
                ("r", "Refresh"),
                ("g", "List view"),
                (":", "Command palette"),
                ("?", "Help"),
            ],
            View::GridDetail => &[
                ("Enter", "Actions"),
                ("Esc / q", "Back to grid"),
                ("?", "Help"),
            ],
        }
    }

    /// Reconstructs the `AppMode` of this view.
    pub fn restore_mode(self) -> AppMode {
        match self {
            View::Main => AppMode::Main,
            View::Grid => AppMode::GridView,
            View::GridDetail => AppMode::GridDetail,
        }
    }

    /// Display title for the help overlay header.
    pub fn title(self) -> &'static str {
        match self {
            View::Main => "Keybindings: list",
            View::Grid => "Keybindings: grid",
            View::GridDetail => "Keybindings: detail",
        }
    }
}

/// What a repository picker feeds into.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RepositoryPurpose {
    Adopt { session_name: String },
    Create,
}

/// What the worktree action menu acts on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MenuTarget {
    Recent {
        entry: RecentEntry,
        has_session: bool,
    },
    Worktree(WorktreeState),
}

impl MenuTarget {
    /// Returns the actions offered for this target.
    pub fn actions(&self) -> Vec<MenuAction> {
        let has_session = match self {
            MenuTarget::Recent { has_session, .. } => *has_session,
            MenuTarget::Worktree(state) => state.has_session,
        };
        let mut actions = vec![MenuAction::Jump];
        if matches!(self, MenuTarget::Worktree(_)) {
            actions.push(MenuAction::Delete);
        }
        if has_session {
            actions.push(MenuAction::KillSession);
        }

        actions
    }

    pub fn title(&self) -> &str {
        match self {
            MenuTarget::Recent { entry, .. } => &entry.worktree,
            MenuTarget::Worktree(state) => &state.working_tree.name,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuAction {
    Adopt,
    Delete,
    Jump,
    KillSession,
}

impl MenuAction {
    /// Actions offered for an orphan session.
    pub const ORPHAN: &[MenuAction] = &[
        MenuAction::Jump,
        MenuAction::Adopt,
        MenuAction::KillSession,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Adopt => "Adopt into a worktree",
            MenuAction::Delete => "Delete worktree",
            MenuAction::Jump => "Jump",
            MenuAction::KillSession => "Kill session",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::worktree::WorkingTree;

    fn state(has_session: bool) -> WorktreeState {
        WorktreeState {
            ahead_count: 0,
            behind_count: 0,
            canonical_session_name: "app-login".to_string(),
            has_session,
            process_names: Vec::new(),
            recent_commits: Vec::new(),
            repository: Repository::from_root(PathBuf::from("/src/app")),
            session_handle: None,
            status_summary: None,
            working_tree: WorkingTree {
                branch: None,
                name: "app-login".to_string(),
                path: PathBuf::from("/src/app-login"),
            },
        }
    }

    #[test]
    fn test_worktree_menu_offers_kill_only_with_session() {
        // Arrange
        let without_session = MenuTarget::Worktree(state(false));
        let with_session = MenuTarget::Worktree(state(true));

        // Act
        let plain = without_session.actions();
        let live = with_session.actions();

        // Assert
        assert_eq!(plain, vec![MenuAction::Jump, MenuAction::Delete]);
        assert_eq!(
            live,
            vec![MenuAction::Jump, MenuAction::Delete, MenuAction::KillSession]
        );
    }

    #[test]
    fn test_overlay_modes_report_their_return_view() {
        // Arrange
        let mode = AppMode::CommandPalette {
            focus: PaletteFocus::Dropdown,
            input: String::new(),
            return_view: View::Grid,
            selected_index: 0,
        };

        // Act
        let view = mode.view();

        // Assert
        assert_eq!(view, View::Grid);
        assert!(matches!(view.restore_mode(), AppMode::GridView));
    }
}
