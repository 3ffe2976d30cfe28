use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::runtime::EventResult;
use crate::runtime::mode::{is_ctrl_c, palette};
use crate::ui::state::app_mode::{AppMode, View};

/// Handles key input while the list view is active.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    if is_ctrl_c(key) {
        return EventResult::Quit;
    }

    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.list.next(),
        KeyCode::Char('k') | KeyCode::Up => app.list.previous(),
        KeyCode::Enter => app.open_menu(View::Main),
        KeyCode::Char('n') => app.start_create(View::Main),
        KeyCode::Char('r') => {
            app.request_refresh();
        }
        KeyCode::Char('g') => app.toggle_view(),
        KeyCode::Char('/' | ':') => palette::open(app, View::Main),
        KeyCode::Char('?') => {
            app.mode = AppMode::Help {
                scroll_offset: 0,
                view: View::Main,
            };
        }
        _ => {}
    }

    EventResult::Continue
}
