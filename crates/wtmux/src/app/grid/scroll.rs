//! Logical line layout of the grid and the scroll rule built on it.
//!
//! The renderer draws with the same constants so scroll math and pixels
//! agree.

use super::cursor::{SectionLens, Slot};

/// Minimum width of one panel column in terminal cells.
pub const MIN_PANEL_WIDTH: u16 = 30;
/// Maximum number of panel columns.
pub const MAX_COLUMNS: usize = 4;
/// Height of the action row holding both sentinels.
pub const ACTIONS_HEIGHT: usize = 3;
/// Height of one section header line.
pub const SECTION_HEADER_HEIGHT: usize = 1;
/// Height of one row of panels.
pub const PANEL_HEIGHT: usize = 6;

/// Returns the column count for a viewport `width`.
pub fn columns_for_width(width: u16) -> usize {
    usize::from(width / MIN_PANEL_WIDTH).clamp(1, MAX_COLUMNS)
}

/// Returns the number of rows needed for `len` items in `columns` columns.
pub fn row_count(len: usize, columns: usize) -> usize {
    len.div_ceil(columns.max(1))
}

/// Returns the height of a section with `len` items; empty sections are not
/// drawn.
pub fn section_height(len: usize, columns: usize) -> usize {
    if len == 0 {
        return 0;
    }

    SECTION_HEADER_HEIGHT + row_count(len, columns) * PANEL_HEIGHT
}

/// Returns the half-open line range `[start, end)` occupied by `slot`.
///
/// A first-row panel includes its section header so the header scrolls into
/// view with it.
pub fn line_range(slot: Slot, lens: SectionLens, columns: usize) -> (usize, usize) {
    let columns = columns.max(1);
    let (section_start, offset) = match slot {
        Slot::NewWorktree | Slot::ListView => return (0, ACTIONS_HEIGHT),
        Slot::Panel(index) if index < lens.sessions => (ACTIONS_HEIGHT, index),
        Slot::Panel(index) => (
            ACTIONS_HEIGHT + section_height(lens.sessions, columns),
            index - lens.sessions,
        ),
        Slot::Available(index) => (
            ACTIONS_HEIGHT
                + section_height(lens.sessions, columns)
                + section_height(lens.recent, columns),
            index,
        ),
    };

    let row = offset / columns;
    let row_start = section_start + SECTION_HEADER_HEIGHT + row * PANEL_HEIGHT;
    let start = if row == 0 { section_start } else { row_start };

    (start, row_start + PANEL_HEIGHT)
}

/// Returns the total logical height of the grid content.
pub fn content_height(lens: SectionLens, columns: usize) -> usize {
    ACTIONS_HEIGHT
        + section_height(lens.sessions, columns)
        + section_height(lens.recent, columns)
        + section_height(lens.available, columns)
}

/// Adjusts `offset` just enough for `[start, end)` to be visible in a
/// viewport of `height` lines.
pub fn adjust_scroll(offset: usize, (start, end): (usize, usize), height: usize) -> usize {
    if height == 0 || start < offset {
        return start;
    }
    if end > offset + height {
        let bottom_aligned = end - height;

        return bottom_aligned.min(start);
    }

    offset
}
