use crossterm::event::KeyEvent;

use crate::app::App;
use crate::runtime::{EventResult, mode};
use crate::ui::state::app_mode::AppMode;

pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    match &app.mode {
        AppMode::Main => mode::list::handle(app, key),
        AppMode::GridView => mode::grid::handle(app, key),
        AppMode::GridDetail => mode::grid_detail::handle(app, key),
        AppMode::SelectRepository { .. } => mode::select_repository::handle(app, key),
        AppMode::CreateName { .. } => mode::create_name::handle(app, key),
        AppMode::CreateBranch { .. } | AppMode::OrphanBranch { .. } => {
            mode::branch_picker::handle(app, key)
        }
        AppMode::ActionMenu { .. } => mode::menu::handle_action_menu(app, key),
        AppMode::OrphanMenu { .. } => mode::menu::handle_orphan_menu(app, key),
        AppMode::CommandPalette { .. } => mode::palette::handle(app, key),
        AppMode::Help { .. } => mode::help::handle(app, key),
    }
}
