use ratatui::Frame;
use ratatui::layout::Rect;

use crate::ui::components::branch_picker_overlay::BranchPickerOverlay;
use crate::ui::components::choice_overlay::ChoiceOverlay;
use crate::ui::components::command_palette::CommandPaletteInput;
use crate::ui::components::help_overlay::HelpOverlay;
use crate::ui::components::name_input_overlay::NameInputOverlay;
use crate::ui::components::notification_toast::NotificationToast;
use crate::ui::pages::grid::GridPage;
use crate::ui::pages::grid_detail::GridDetailPage;
use crate::ui::pages::worktree_list::WorktreeListPage;
use crate::ui::state::app_mode::{AppMode, MenuAction, RepositoryPurpose, View};
use crate::ui::style::Theme;
use crate::ui::{Component, Page, RenderContext};

/// Routes the content-area render path: the view underneath first, then the
/// overlay of the active mode, then the notification.
pub(crate) fn route_frame(f: &mut Frame, area: Rect, context: RenderContext<'_>) {
    let RenderContext {
        grid,
        list,
        mode,
        notification,
        preview,
        snapshot,
        theme,
        ..
    } = context;

    match mode.view() {
        View::Main => WorktreeListPage::new(list, snapshot, preview, theme).render(f, area),
        View::Grid => GridPage::new(grid, theme).render(f, area),
        View::GridDetail => {
            let panel = grid.selected_panel();
            let worktree = panel
                .and_then(|panel| panel.checkout_path())
                .and_then(|path| snapshot.worktree_by_path(path));

            GridDetailPage::new(panel, worktree, preview, theme).render(f, area);
        }
    }

    render_overlay(f, area, mode, theme);

    if let Some(notification) = notification {
        NotificationToast::new(notification, theme).render(f, area);
    }
}

fn render_overlay(f: &mut Frame, area: Rect, mode: &AppMode, theme: Theme) {
    match mode {
        AppMode::Main | AppMode::GridView | AppMode::GridDetail => {}
        AppMode::SelectRepository {
            purpose,
            repositories,
            selected_index,
            ..
        } => {
            let title = match purpose {
                RepositoryPurpose::Adopt { session_name } => format!("Adopt `{session_name}` into"),
                RepositoryPurpose::Create => "Create worktree in".to_string(),
            };
            let items = repositories
                .iter()
                .map(|repository| repository.name.clone())
                .collect();

            ChoiceOverlay::new(title, items, *selected_index, theme).render(f, area);
        }
        AppMode::CreateName {
            input,
            is_loading,
            repository,
            ..
        } => {
            NameInputOverlay::new(&repository.name, input, *is_loading, theme).render(f, area);
        }
        AppMode::CreateBranch { name, picker, .. } => {
            BranchPickerOverlay::new(format!("Base branch for `{name}`"), picker, theme)
                .render(f, area);
        }
        AppMode::OrphanBranch {
            picker,
            session_name,
            ..
        } => {
            let title = format!("Base branch to adopt `{session_name}`");

            BranchPickerOverlay::new(title, picker, theme).render(f, area);
        }
        AppMode::ActionMenu {
            selected_index,
            target,
            ..
        } => {
            let items = target
                .actions()
                .into_iter()
                .map(|action| action.label().to_string())
                .collect();

            ChoiceOverlay::new(target.title().to_string(), items, *selected_index, theme)
                .render(f, area);
        }
        AppMode::OrphanMenu {
            selected_index,
            session_name,
            ..
        } => {
            let items = MenuAction::ORPHAN
                .iter()
                .map(|action| action.label().to_string())
                .collect();

            ChoiceOverlay::new(format!("{session_name} (orphan)"), items, *selected_index, theme)
                .render(f, area);
        }
        AppMode::CommandPalette {
            focus,
            input,
            selected_index,
            ..
        } => {
            CommandPaletteInput::new(input, *selected_index, *focus, theme).render(f, area);
        }
        AppMode::Help {
            scroll_offset,
            view,
        } => {
            HelpOverlay::new(*view, *scroll_offset, theme).render(f, area);
        }
    }
}
