use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::runtime::EventResult;
use crate::runtime::mode::is_ctrl_c;
use crate::ui::state::app_mode::{AppMode, MenuAction};

/// Handles key input while the worktree action menu is open.
pub(crate) fn handle_action_menu(app: &mut App, key: KeyEvent) -> EventResult {
    let AppMode::ActionMenu {
        return_view,
        selected_index,
        target,
    } = &mut app.mode
    else {
        return EventResult::Continue;
    };
    let action_count = target.actions().len();

    match menu_key(key) {
        MenuKey::Close => app.mode = return_view.restore_mode(),
        MenuKey::Confirm => app.run_menu_action(),
        MenuKey::Down => *selected_index = (*selected_index + 1).min(action_count - 1),
        MenuKey::Up => *selected_index = selected_index.saturating_sub(1),
        MenuKey::Other => {}
    }

    EventResult::Continue
}

/// Handles key input while the orphan session menu is open.
pub(crate) fn handle_orphan_menu(app: &mut App, key: KeyEvent) -> EventResult {
    let AppMode::OrphanMenu {
        return_view,
        selected_index,
        ..
    } = &mut app.mode
    else {
        return EventResult::Continue;
    };

    match menu_key(key) {
        MenuKey::Close => app.mode = return_view.restore_mode(),
        MenuKey::Confirm => app.run_orphan_action(),
        MenuKey::Down => {
            *selected_index = (*selected_index + 1).min(MenuAction::ORPHAN.len() - 1);
        }
        MenuKey::Up => *selected_index = selected_index.saturating_sub(1),
        MenuKey::Other => {}
    }

    EventResult::Continue
}

enum MenuKey {
    Close,
    Confirm,
    Down,
    Other,
    Up,
}

fn menu_key(key: KeyEvent) -> MenuKey {
    if is_ctrl_c(key) {
        return MenuKey::Close;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => MenuKey::Close,
        KeyCode::Enter => MenuKey::Confirm,
        KeyCode::Char('j') | KeyCode::Down => MenuKey::Down,
        KeyCode::Char('k') | KeyCode::Up => MenuKey::Up,
        _ => MenuKey::Other,
    }
}
