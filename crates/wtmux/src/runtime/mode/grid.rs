use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::app::grid::GridMove;
use crate::runtime::EventResult;
use crate::runtime::mode::{is_ctrl_c, palette};
use crate::ui::state::app_mode::{AppMode, View};

/// Handles key input while the grid view is active.
///
/// While filter text is being entered every printable key, digits included,
/// goes to the filter.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> EventResult {
    if is_ctrl_c(key) {
        return EventResult::Quit;
    }
    if let Some(grid_move) = arrow_move(key.code) {
        app.grid.move_cursor(grid_move);

        return EventResult::Continue;
    }
    if app.grid.is_filter_editing() {
        handle_filter_input(app, key);

        return EventResult::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Char('h') => app.grid.move_cursor(GridMove::Left),
        KeyCode::Char('j') => app.grid.move_cursor(GridMove::Down),
        KeyCode::Char('k') => app.grid.move_cursor(GridMove::Up),
        KeyCode::Char('l') => app.grid.move_cursor(GridMove::Right),
        KeyCode::Char(digit @ '1'..='9') => {
            if let Some(number) = digit
                .to_digit(10)
                .and_then(|number| usize::try_from(number).ok())
            {
                app.grid.quick_select(number);
            }
        }
        KeyCode::Enter => app.activate_grid_selection(),
        KeyCode::Char('/') => app.grid.begin_filter(),
        KeyCode::Esc => app.grid.clear_filter(),
        KeyCode::Char('n') => app.start_create(View::Grid),
        KeyCode::Char('r') => {
            app.request_refresh();
        }
        KeyCode::Char('g') => app.toggle_view(),
        KeyCode::Char(':') => palette::open(app, View::Grid),
        KeyCode::Char('?') => {
            app.mode = AppMode::Help {
                scroll_offset: 0,
                view: View::Grid,
            };
        }
        _ => {}
    }

    EventResult::Continue
}

fn arrow_move(code: KeyCode) -> Option<GridMove> {
    match code {
        KeyCode::Down => Some(GridMove::Down),
        KeyCode::Left => Some(GridMove::Left),
        KeyCode::Right => Some(GridMove::Right),
        KeyCode::Up => Some(GridMove::Up),
        KeyCode::Tab => Some(GridMove::Next),
        KeyCode::BackTab => Some(GridMove::Previous),
        _ => None,
    }
}

fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.grid.clear_filter(),
        KeyCode::Enter => app.grid.finish_filter(),
        KeyCode::Backspace => app.grid.pop_filter_char(),
        KeyCode::Char(character) => app.grid.push_filter_char(character),
        _ => {}
    }
}
