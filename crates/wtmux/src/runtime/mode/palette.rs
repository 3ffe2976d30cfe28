use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::runtime::EventResult;
use crate::runtime::mode::is_ctrl_c;
use crate::ui::state::app_mode::{AppMode, View};
use crate::ui::state::palette::{PaletteCommand, PaletteFocus};

/// Opens an empty command palette over `return_view`.
pub(crate) fn open(app: &mut App, return_view: View) {
    app.mode = AppMode::CommandPalette {
        focus: PaletteFocus::Dropdown,
        input: String::new(),
        return_view,
        selected_index: 0,
    };
}

/// Handles key input while the command palette is open.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    let AppMode::CommandPalette {
        focus,
        input,
        return_view,
        selected_index,
    } = &mut app.mode
    else {
        return EventResult::Continue;
    };
    let return_view = *return_view;
    let mut command = None;

    match key.code {
        _ if is_ctrl_c(key) => app.mode = return_view.restore_mode(),
        KeyCode::Char(character) => {
            input.push(character);
            update_palette_focus(input, selected_index, focus);
        }
        KeyCode::Backspace => {
            input.pop();
            update_palette_focus(input, selected_index, focus);
        }
        KeyCode::Up if *focus == PaletteFocus::Dropdown => {
            *selected_index = selected_index.saturating_sub(1);
        }
        KeyCode::Down if *focus == PaletteFocus::Dropdown => {
            move_palette_selection_down(input, selected_index, focus);
        }
        KeyCode::Enter if *focus == PaletteFocus::Dropdown => {
            command = PaletteCommand::filter(input).get(*selected_index).copied();
        }
        KeyCode::Esc => {
            if *focus == PaletteFocus::Dropdown {
                *focus = PaletteFocus::Input;
            } else {
                app.mode = return_view.restore_mode();
            }
        }
        _ => {}
    }

    match command {
        Some(command) => run_command(app, command, return_view),
        None => EventResult::Continue,
    }
}

fn run_command(app: &mut App, command: PaletteCommand, return_view: View) -> EventResult {
    app.mode = return_view.restore_mode();

    match command {
        PaletteCommand::Help => {
            app.mode = AppMode::Help {
                scroll_offset: 0,
                view: return_view,
            };
        }
        PaletteCommand::NewWorktree => app.start_create(return_view),
        PaletteCommand::Quit => return EventResult::Quit,
        PaletteCommand::Refresh => {
            if !app.request_refresh() {
                app.notify_info("A refresh is already running");
            }
        }
        PaletteCommand::ToggleGrid => app.toggle_view(),
    }

    EventResult::Continue
}

fn update_palette_focus(input: &str, selected_index: &mut usize, focus: &mut PaletteFocus) {
    let filtered = PaletteCommand::filter(input);
    *selected_index = 0;
    *focus = if filtered.is_empty() {
        PaletteFocus::Input
    } else {
        PaletteFocus::Dropdown
    };
}

fn move_palette_selection_down(input: &str, selected_index: &mut usize, focus: &mut PaletteFocus) {
    let filtered = PaletteCommand::filter(input);
    if filtered.is_empty() {
        *focus = PaletteFocus::Input;

        return;
    }
    if *selected_index >= filtered.len().saturating_sub(1) {
        *focus = PaletteFocus::Input;
    } else {
        *selected_index += 1;
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::app::test_support::new_idle_app;

    fn type_query(app: &mut App, query: &str) {
        for character in query.chars() {
            handle(app, KeyEvent::new(KeyCode::Char(character), KeyModifiers::NONE));
        }
    }

    #[tokio::test]
    async fn test_handle_character_updates_input_and_focus() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        app.mode = AppMode::CommandPalette {
            focus: PaletteFocus::Input,
            input: String::new(),
            return_view: View::Main,
            selected_index: 3,
        };

        // Act
        let result = handle(
            &mut app,
            KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE),
        );

        // Assert
        assert_eq!(result, EventResult::Continue);
        assert!(matches!(
            app.mode,
            AppMode::CommandPalette {
                focus: PaletteFocus::Dropdown,
                ref input,
                selected_index: 0,
                ..
            } if input == "r"
        ));
    }

    #[tokio::test]
    async fn test_toggle_grid_command_switches_view() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        open(&mut app, View::Main);
        type_query(&mut app, "grid");

        // Act
        let result = handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert_eq!(result, EventResult::Continue);
        assert!(matches!(app.mode, AppMode::GridView));
    }

    #[tokio::test]
    async fn test_quit_command_quits() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        open(&mut app, View::Grid);
        type_query(&mut app, "quit");

        // Act
        let result = handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert_eq!(result, EventResult::Quit);
    }

    #[tokio::test]
    async fn test_help_command_opens_help_for_origin_view() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        open(&mut app, View::Grid);
        type_query(&mut app, "help");

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        // Assert
        assert!(matches!(
            app.mode,
            AppMode::Help {
                view: View::Grid,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_escape_switches_focus_before_closing() {
        // Arrange
        let (mut app, _journal_dir) = new_idle_app();
        open(&mut app, View::Grid);

        // Act
        handle(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        let focused_input = matches!(
            app.mode,
            AppMode::CommandPalette {
                focus: PaletteFocus::Input,
                ..
            }
        );
        handle(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));

        // Assert
        assert!(focused_input);
        assert!(matches!(app.mode, AppMode::GridView));
    }

    #[test]
    fn test_move_palette_selection_down_hands_focus_to_input_at_end() {
        // Arrange
        let mut selected_index = 0;
        let mut focus = PaletteFocus::Dropdown;

        // Act
        move_palette_selection_down("quit", &mut selected_index, &mut focus);

        // Assert
        assert_eq!(selected_index, 0);
        assert_eq!(focus, PaletteFocus::Input);
    }
}
