use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::runtime::EventResult;
use crate::runtime::mode::is_ctrl_c;
use crate::ui::state::app_mode::AppMode;

/// Handles key input while the new worktree name is being typed.
///
/// Input is frozen while the branch list for a submitted name loads.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    let AppMode::CreateName {
        input,
        is_loading,
        return_view,
        ..
    } = &mut app.mode
    else {
        return EventResult::Continue;
    };

    if is_ctrl_c(key) || key.code == KeyCode::Esc {
        app.mode = return_view.restore_mode();

        return EventResult::Continue;
    }
    if *is_loading {
        return EventResult::Continue;
    }

    match key.code {
        KeyCode::Enter => app.submit_create_name(),
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Char(character) => input.push(character),
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

    fn create_name_mode(input: &str, is_loading: bool) -> AppMode {
        AppMode::CreateName {
            input: input.to_string(),
            is_loading,
            repository: repository(),
            return_view: View::Main,
        }
    }

    #[tokio::test]
    async fn test_typing_and_backspace_edit_the_name() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = create_name_mode("", false);

        // Act
        for character in ['l', 'o', 'g', 'x'] {
            handle(
                &mut app,
                KeyEvent::new(KeyCode::Char(character), KeyModifiers::NONE),
            );
        }
        handle(
            &mut app,
            KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE),
        );

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::CreateName { ref input, .. } if input == "log"
        ));
    }

    #[tokio::test]
    async fn test_enter_with_valid_name_starts_loading_branches() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = create_name_mode("login", false);

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::CreateName {
                is_loading: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_typing_is_ignored_while_loading() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = create_name_mode("login", true);

        // Act
        handle(
            &mut app,
            KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE),
        );

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::CreateName { ref input, .. } if input == "login"
        ));
    }

    #[tokio::test]
    async fn test_escape_discards_name() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = create_name_mode("login", false);

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));

        // Assert
        assert!(matches!(app.mode, AppMode::Main));
    }
}
