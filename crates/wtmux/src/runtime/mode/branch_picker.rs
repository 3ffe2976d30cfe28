use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::runtime::EventResult;
use crate::runtime::mode::is_ctrl_c;
use crate::ui::state::app_mode::AppMode;

/// Handles key input for the base-branch pickers of the create and adopt
/// flows.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    let (picker, return_view, is_create) = match &mut app.mode {
        AppMode::CreateBranch {
            picker,
            return_view,
            ..
        } => (picker, *return_view, true),
        AppMode::OrphanBranch {
            picker,
            return_view,
            ..
        } => (picker, *return_view, false),
        _ => return EventResult::Continue,
    };

    if is_ctrl_c(key) || key.code == KeyCode::Esc {
        app.mode = return_view.restore_mode();

        return EventResult::Continue;
    }
    if picker.is_loading {
        return EventResult::Continue;
    }

    match key.code {
        KeyCode::Down => picker.next(),
        KeyCode::Up => picker.previous(),
        KeyCode::Backspace => picker.pop_filter_char(),
        KeyCode::Char(character) => picker.push_filter_char(character),
        KeyCode::Enter if is_create => app.confirm_create_branch(),
        KeyCode::Enter => app.confirm_orphan_branch(),
        _ => {}
    }

    EventResult::Continue
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::app::test_support::{new_idle_app, repository};
    use crate::ui::state::app_mode::View;
    use crate::ui::state::picker::BranchPicker;

    fn branches() -> Vec<String> {
        vec![
            "main".to_string(),
            "feature/login".to_string(),
            "release".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_typing_filters_branches() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::CreateBranch {
            name: "login".to_string(),
            picker: BranchPicker::loaded(branches()),
            repository: repository(),
            return_view: View::Main,
        };

        // Act
        for character in ['r', 'e', 'l'] {
            handle(
                &mut app,
                KeyEvent::new(KeyCode::Char(character), KeyModifiers::NONE),
            );
        }

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::CreateBranch { ref picker, .. } if picker.selected() == Some("release")
        ));
    }

    #[tokio::test]
    async fn test_enter_confirms_create_and_restores_view() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::CreateBranch {
            name: "login".to_string(),
            picker: BranchPicker::loaded(branches()),
            repository: repository(),
            return_view: View::Grid,
        };

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert!(matches!(app.mode, AppMode::GridView));
        assert_eq!(
            app.notification().map(|notification| notification.message.as_str()),
            Some("Creating `login` from `main`")
        );
    }

    #[tokio::test]
    async fn test_enter_while_loading_is_ignored() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::OrphanBranch {
            picker: BranchPicker::loading(),
            repository: repository(),
            return_view: View::Main,
            session_name: "scratch".to_string(),
        };

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert!(matches!(app.mode, AppMode::OrphanBranch { .. }));
    }

    #[tokio::test]
    async fn test_escape_abandons_adopt() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::OrphanBranch {
            picker: BranchPicker::loaded(branches()),
            repository: repository(),
            return_view: View::Main,
            session_name: "scratch".to_string(),
        };

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));

        // Assert
        assert!(matches!(app.mode, AppMode::Main));
    }
}
