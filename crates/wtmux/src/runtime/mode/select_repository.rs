use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::runtime::EventResult;
use crate::runtime::mode::is_ctrl_c;
use crate::ui::state::app_mode::AppMode;

/// Handles key input while the repository picker is open.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    let AppMode::SelectRepository {
        repositories,
        return_view,
        selected_index,
        ..
    } = &mut app.mode
    else {
        return EventResult::Continue;
    };

    if is_ctrl_c(key) {
        app.mode = return_view.restore_mode();

        return EventResult::Continue;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if !repositories.is_empty() {
                *selected_index = (*selected_index + 1).min(repositories.len() - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            *selected_index = selected_index.saturating_sub(1);
        }
        KeyCode::Enter => app.choose_repository(),
        KeyCode::Esc | KeyCode::Char('q') => app.mode = return_view.restore_mode(),
        _ => {}
    }

    EventResult::Continue
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::app::test_support::new_idle_app;
    use crate::domain::repository::Repository;
    use crate::ui::state::app_mode::{RepositoryPurpose, View};

    fn picker_mode() -> AppMode {
        AppMode::SelectRepository {
            purpose: RepositoryPurpose::Create,
            repositories: vec![
                Repository::from_root(PathBuf::from("/src/api")),
                Repository::from_root(PathBuf::from("/src/web")),
            ],
            return_view: View::Grid,
            selected_index: 0,
        }
    }

    #[tokio::test]
    async fn test_down_then_enter_creates_in_second_repository() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = picker_mode();

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        handle(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::CreateName {
                ref repository,
                return_view: View::Grid,
                ..
            } if repository.name == "web"
        ));
    }

    #[tokio::test]
    async fn test_escape_returns_to_previous_view() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = picker_mode();

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));

        // Assert
        assert!(matches!(app.mode, AppMode::GridView));
    }
}
