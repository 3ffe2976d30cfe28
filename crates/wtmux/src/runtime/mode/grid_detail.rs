use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::runtime::EventResult;
use crate::ui::state::app_mode::{AppMode, View};

/// Handles key input while one grid panel is shown in detail.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Enter => app.open_menu(View::GridDetail),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => {
            app.mode = AppMode::GridView;
        }
        KeyCode::Char('r') => {
            app.request_refresh();
        }
        KeyCode::Char('?') => {
            app.mode = AppMode::Help {
                scroll_offset: 0,
                view: View::GridDetail,
            };
        }
        _ => {}
    }

    EventResult::Continue
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::app::test_support::{load_snapshot, new_idle_app, sample_snapshot};
    use crate::ui::state::app_mode::MenuTarget;

    #[tokio::test]
    async fn test_q_goes_back_to_grid_instead_of_quitting() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::GridDetail;

        // Act
        let result = handle(
            &mut app,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
        );

        // Assert
        assert_eq!(result, EventResult::Continue);
        assert!(matches!(app.mode, AppMode::GridView));
    }

    #[tokio::test]
    async fn test_enter_opens_menu_for_detailed_panel() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::GridView;
        load_snapshot(&mut app, sample_snapshot());
        app.grid.quick_select(1);
        app.mode = AppMode::GridDetail;

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::ActionMenu {
                return_view: View::GridDetail,
                target: MenuTarget::Worktree(ref state),
                ..
            } if state.working_tree.name == "app-login"
        ));
    }
}
