//! `AppMode`-specific key handling modules.

pub(crate) mod branch_picker;
pub(crate) mod create_name;
pub(crate) mod grid;
pub(crate) mod grid_detail;
pub(crate) mod help;
pub(crate) mod list;
pub(crate) mod menu;
pub(crate) mod palette;
pub(crate) mod select_repository;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn is_ctrl_c(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
