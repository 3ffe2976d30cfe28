//! Grid navigation engine.
//!
//! Owns the panel sections, the filter and its cache, and the navigation
//! cursor. Every mutation leaves the cursor on a slot that exists in the
//! current filtered view.

pub mod cursor;
pub mod filter;
pub mod scroll;

use crate::domain::panel::{GridPanel, PanelSet, SelectionKey};

use self::cursor::{NavigationCursor, SectionLens, Slot};
use self::filter::FilterCache;

/// Movement requested by a key press.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GridMove {
    Down,
    Left,
    Next,
    Previous,
    Right,
    Up,
}

/// What the grid cursor currently resolves to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GridTarget<'a> {
    NewWorktree,
    ListView,
    Panel(&'a GridPanel),
}

/// Full grid state kept across frames.
#[derive(Debug)]
pub struct GridState {
    available: Vec<GridPanel>,
    cache: FilterCache,
    columns: usize,
    cursor: NavigationCursor,
    filter_editing: bool,
    filter_text: String,
    generation: u64,
    /// Sessions followed by recent entries; they share one index space.
    panels: Vec<GridPanel>,
    pending_key: Option<SelectionKey>,
    scroll_offset: usize,
    session_count: usize,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            available: Vec::new(),
            cache: FilterCache::build("", 0, &[], 0, &[]),
            columns: 1,
            cursor: NavigationCursor::default(),
            filter_editing: false,
            filter_text: String::new(),
            generation: 0,
            panels: Vec::new(),
            pending_key: None,
            scroll_offset: 0,
            session_count: 0,
        }
    }
}

impl GridState {
    /// Replaces the panel data, keeping the cursor on the same target when
    /// it still exists.
    ///
    /// A pending key from a create or adopt wins over the current target and
    /// stays pending until its panel appears.
    pub fn set_panels(&mut self, panel_set: PanelSet) {
        let current_key = self.selected_key();
        let PanelSet {
            available,
            recent,
            sessions,
        } = panel_set;

        self.session_count = sessions.len();
        self.panels = sessions;
        self.panels.extend(recent);
        self.available = available;
        self.generation = self.generation.wrapping_add(1);
        self.refresh_cache();

        if let Some(pending_key) = self.pending_key.clone()
            && let Some(slot) = self.find_slot(&pending_key)
        {
            self.pending_key = None;
            self.cursor.set_slot(slot);

            return;
        }

        match current_key {
            Some(key) => {
                let slot = self.find_slot(&key).unwrap_or(Slot::NewWorktree);
                self.cursor.set_slot(slot);
            }
            None => self.clamp_cursor(),
        }
    }

    /// Remembers `key` so the cursor jumps to it once a refresh contains it.
    pub fn set_pending_key(&mut self, key: SelectionKey) {
        self.pending_key = Some(key);
    }

    /// Drops the pending key, for example after the create that set it
    /// failed.
    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }

    /// Updates the column count from the viewport width.
    pub fn set_width(&mut self, width: u16) {
        self.columns = scroll::columns_for_width(width);
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Applies one movement.
    pub fn move_cursor(&mut self, grid_move: GridMove) {
        let lens = self.lens();
        let slot = self.cursor.slot();
        let next = match grid_move {
            GridMove::Down => cursor::move_down(slot, lens, self.columns),
            GridMove::Left => cursor::move_left(slot, lens),
            GridMove::Next => cursor::move_next(slot, lens),
            GridMove::Previous => cursor::move_previous(slot, lens),
            GridMove::Right => cursor::move_right(slot, lens),
            GridMove::Up => cursor::move_up(slot, lens, self.columns),
        };

        self.cursor.set_slot(next);
    }

    /// Selects the `number`th (1-based) entry of the filtered panels followed
    /// by the filtered available worktrees. Out-of-range numbers are ignored.
    pub fn quick_select(&mut self, number: usize) {
        let Some(position) = number.checked_sub(1) else {
            return;
        };
        let lens = self.lens();
        if position >= lens.panels() + lens.available {
            return;
        }

        self.cursor.set_slot(lens.slot_at(2 + position));
    }

    /// Starts filter entry. Existing text is kept for refinement.
    pub fn begin_filter(&mut self) {
        self.filter_editing = true;
    }

    /// Stops filter entry, keeping the filter applied.
    pub fn finish_filter(&mut self) {
        self.filter_editing = false;
    }

    /// Stops filter entry and removes the filter.
    pub fn clear_filter(&mut self) {
        self.filter_editing = false;
        self.set_filter_text(String::new());
    }

    pub fn push_filter_char(&mut self, character: char) {
        let mut text = self.filter_text.clone();
        text.push(character);
        self.set_filter_text(text);
    }

    pub fn pop_filter_char(&mut self) {
        let mut text = self.filter_text.clone();
        text.pop();
        self.set_filter_text(text);
    }

    /// Replaces the filter text and re-validates the cursor against the new
    /// filtered view.
    ///
    /// The cursor stays on its target when the target still matches;
    /// otherwise it falls back to the first session, then the first
    /// available worktree, then the new-worktree action.
    pub fn set_filter_text(&mut self, text: String) {
        let current_key = self.selected_key();
        self.filter_text = text;
        self.refresh_cache();

        if let Some(key) = current_key {
            let slot = self
                .find_slot(&key)
                .unwrap_or_else(|| self.fallback_slot());
            self.cursor.set_slot(slot);
        }
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn is_filter_editing(&self) -> bool {
        self.filter_editing
    }

    /// Returns what the cursor points at.
    pub fn selected(&self) -> GridTarget<'_> {
        match self.cursor.slot() {
            Slot::NewWorktree => GridTarget::NewWorktree,
            Slot::ListView => GridTarget::ListView,
            slot => self
                .panel_at(slot)
                .map_or(GridTarget::NewWorktree, GridTarget::Panel),
        }
    }

    /// Returns the selected panel, if a panel is selected.
    pub fn selected_panel(&self) -> Option<&GridPanel> {
        match self.selected() {
            GridTarget::Panel(panel) => Some(panel),
            GridTarget::NewWorktree | GridTarget::ListView => None,
        }
    }

    pub fn selected_slot(&self) -> Slot {
        self.cursor.slot()
    }

    pub fn cursor(&self) -> NavigationCursor {
        self.cursor
    }

    /// Returns the filtered item count of each section.
    pub fn lens(&self) -> SectionLens {
        SectionLens {
            available: self.cache.filtered_available.len(),
            recent: self.cache.filtered_panels.len() - self.cache.filtered_session_count,
            sessions: self.cache.filtered_session_count,
        }
    }

    /// Returns the filtered sessions section.
    pub fn visible_sessions(&self) -> Vec<&GridPanel> {
        self.cache.filtered_panels[..self.cache.filtered_session_count]
            .iter()
            .filter_map(|position| self.panels.get(*position))
            .collect()
    }

    /// Returns the filtered recent section.
    pub fn visible_recent(&self) -> Vec<&GridPanel> {
        self.cache.filtered_panels[self.cache.filtered_session_count..]
            .iter()
            .filter_map(|position| self.panels.get(*position))
            .collect()
    }

    /// Returns the filtered available section.
    pub fn visible_available(&self) -> Vec<&GridPanel> {
        self.cache
            .filtered_available
            .iter()
            .filter_map(|position| self.available.get(*position))
            .collect()
    }

    /// Returns the number of unfiltered panels across all sections.
    pub fn total_panels(&self) -> usize {
        self.panels.len() + self.available.len()
    }

    /// Updates and returns the scroll offset for a viewport of `height`
    /// lines.
    pub fn update_scroll(&mut self, height: usize) -> usize {
        let range = scroll::line_range(self.cursor.slot(), self.lens(), self.columns);
        self.scroll_offset = scroll::adjust_scroll(self.scroll_offset, range, height);

        self.scroll_offset
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn refresh_cache(&mut self) {
        if self.cache.is_current(&self.filter_text, self.generation) {
            return;
        }

        self.cache = FilterCache::build(
            &self.filter_text,
            self.generation,
            &self.panels,
            self.session_count,
            &self.available,
        );
    }

    fn panel_at(&self, slot: Slot) -> Option<&GridPanel> {
        match slot {
            Slot::Panel(index) => self
                .cache
                .filtered_panels
                .get(index)
                .and_then(|position| self.panels.get(*position)),
            Slot::Available(index) => self
                .cache
                .filtered_available
                .get(index)
                .and_then(|position| self.available.get(*position)),
            Slot::NewWorktree | Slot::ListView => None,
        }
    }

    fn selected_key(&self) -> Option<SelectionKey> {
        self.panel_at(self.cursor.slot()).map(GridPanel::key)
    }

    fn find_slot(&self, key: &SelectionKey) -> Option<Slot> {
        let panel_slot = self
            .cache
            .filtered_panels
            .iter()
            .position(|position| {
                self.panels
                    .get(*position)
                    .is_some_and(|panel| panel.matches_key(key))
            })
            .map(Slot::Panel);

        panel_slot.or_else(|| {
            self.cache
                .filtered_available
                .iter()
                .position(|position| {
                    self.available
                        .get(*position)
                        .is_some_and(|panel| panel.matches_key(key))
                })
                .map(Slot::Available)
        })
    }

    fn fallback_slot(&self) -> Slot {
        let lens = self.lens();
        if lens.panels() > 0 {
            return Slot::Panel(0);
        }
        if lens.available > 0 {
            return Slot::Available(0);
        }

        Slot::NewWorktree
    }

    fn clamp_cursor(&mut self) {
        let lens = self.lens();
        let slot = self.cursor.slot();
        if !lens.contains(slot) {
            self.cursor.set_slot(Slot::NewWorktree);
        }
        if self.cursor.available_index >= lens.available {
            self.cursor.available_index = lens.available.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn panel(name: &str, has_session: bool) -> GridPanel {
        GridPanel {
            branch: format!("branch-{name}"),
            display_name: name.to_string(),
            has_session,
            path: PathBuf::from(format!("/src/{name}")),
            session_name: name.to_string(),
            ..GridPanel::default()
        }
    }

    fn panel_set(sessions: &[&str], available: &[&str]) -> PanelSet {
        PanelSet {
            available: available.iter().map(|name| panel(name, false)).collect(),
            recent: Vec::new(),
            sessions: sessions.iter().map(|name| panel(name, true)).collect(),
        }
    }

    fn selected_name(grid: &GridState) -> Option<String> {
        grid.selected_panel()
            .map(|panel| panel.display_name.clone())
    }

    #[test]
    fn test_empty_grid_only_offers_actions() {
        // Arrange
        let mut grid = GridState::default();

        // Act
        grid.set_panels(PanelSet::default());
        grid.move_cursor(GridMove::Down);
        let after_down = grid.selected_slot();
        grid.move_cursor(GridMove::Right);

        // Assert
        assert_eq!(grid.lens(), SectionLens::default());
        assert_eq!(after_down, Slot::NewWorktree);
        assert!(matches!(grid.selected(), GridTarget::ListView));
    }

    #[test]
    fn test_refresh_keeps_cursor_on_same_target() {
        // Arrange
        let mut grid = GridState::default();
        grid.set_width(90);
        grid.set_panels(panel_set(&["api", "web"], &["docs"]));
        grid.move_cursor(GridMove::Next);
        grid.move_cursor(GridMove::Next);
        grid.move_cursor(GridMove::Next);

        // Act
        grid.set_panels(panel_set(&["new", "api", "web"], &["docs"]));

        // Assert
        assert_eq!(selected_name(&grid), Some("web".to_string()));
        assert_eq!(grid.selected_slot(), Slot::Panel(2));
    }

    #[test]
    fn test_refresh_falls_back_to_sentinel_when_target_vanishes() {
        // Arrange
        let mut grid = GridState::default();
        grid.set_panels(panel_set(&["api", "web"], &[]));
        grid.quick_select(2);

        // Act
        grid.set_panels(panel_set(&["api"], &[]));

        // Assert
        assert!(matches!(grid.selected(), GridTarget::NewWorktree));
    }

    #[test]
    fn test_refresh_follows_worktree_when_its_session_dies() {
        // Arrange
        let mut grid = GridState::default();
        grid.set_panels(panel_set(&["api", "web"], &[]));
        grid.quick_select(2);

        // Act
        grid.set_panels(panel_set(&["api"], &["docs", "web"]));

        // Assert
        assert_eq!(selected_name(&grid), Some("web".to_string()));
        assert_eq!(grid.selected_slot(), Slot::Available(1));
    }

    #[test]
    fn test_pending_key_selects_created_panel_once_it_appears() {
        // Arrange
        let mut grid = GridState::default();
        grid.set_panels(panel_set(&["api"], &[]));
        grid.quick_select(1);
        grid.set_pending_key(SelectionKey::Path(PathBuf::from("/src/login")));

        // Act
        grid.set_panels(panel_set(&["api"], &[]));
        let before = selected_name(&grid);
        grid.set_panels(panel_set(&["api"], &["login"]));

        // Assert
        assert_eq!(before, Some("api".to_string()));
        assert_eq!(selected_name(&grid), Some("login".to_string()));
        assert_eq!(grid.selected_slot(), Slot::Available(0));
    }

    #[test]
    fn test_filter_change_falls_back_sessions_then_available_then_sentinel() {
        // Arrange
        let mut grid = GridState::default();
        grid.set_panels(panel_set(&["api", "web"], &["docs"]));
        grid.quick_select(1);

        // Act
        grid.set_filter_text("we".to_string());
        let to_session = selected_name(&grid);
        grid.set_filter_text("doc".to_string());
        let to_available = selected_name(&grid);
        grid.set_filter_text("zzz".to_string());

        // Assert
        assert_eq!(to_session, Some("web".to_string()));
        assert_eq!(to_available, Some("docs".to_string()));
        assert!(matches!(grid.selected(), GridTarget::NewWorktree));
    }

    #[test]
    fn test_filter_keeps_target_that_still_matches() {
        // Arrange
        let mut grid = GridState::default();
        grid.set_panels(panel_set(&["api", "web"], &[]));
        grid.quick_select(2);

        // Act
        grid.set_filter_text("branch-".to_string());

        // Assert
        assert_eq!(selected_name(&grid), Some("web".to_string()));
    }

    #[test]
    fn test_filter_is_idempotent() {
        // Arrange
        let mut grid = GridState::default();
        grid.set_panels(panel_set(&["api", "web", "worker"], &["wiki"]));
        grid.set_filter_text("w".to_string());
        let first_lens = grid.lens();
        let first_cursor = grid.cursor();

        // Act
        grid.set_filter_text("w".to_string());

        // Assert
        assert_eq!(grid.lens(), first_lens);
        assert_eq!(grid.cursor(), first_cursor);
        assert_eq!(grid.visible_sessions().len(), 2);
        assert_eq!(grid.visible_available().len(), 1);
    }

    #[test]
    fn test_quick_select_spans_panels_then_available() {
        // Arrange
        let mut grid = GridState::default();
        grid.set_panels(panel_set(&["api"], &["docs", "wiki"]));

        // Act
        grid.quick_select(3);
        let third = selected_name(&grid);
        grid.quick_select(9);

        // Assert
        assert_eq!(third, Some("wiki".to_string()));
        assert_eq!(selected_name(&grid), Some("wiki".to_string()));
    }

    #[test]
    fn test_cursor_stays_valid_across_mixed_operations() {
        // Arrange
        let mut grid = GridState::default();
        let datasets = [
            panel_set(&["a", "b", "c", "d", "e"], &["f", "g"]),
            panel_set(&["a"], &[]),
            panel_set(&[], &["g", "h", "i"]),
            panel_set(&[], &[]),
        ];
        let filters = ["", "a", "g", "zz", ""];
        let moves = [
            GridMove::Down,
            GridMove::Right,
            GridMove::Down,
            GridMove::Next,
            GridMove::Up,
            GridMove::Previous,
            GridMove::Left,
        ];

        // Act
        for (step, grid_move) in moves.iter().cycle().take(120).enumerate() {
            if step % 7 == 0 {
                grid.set_panels(datasets[step / 7 % datasets.len()].clone());
            }
            if step % 5 == 0 {
                grid.set_filter_text(filters[step / 5 % filters.len()].to_string());
            }
            if step % 11 == 0 {
                grid.set_width(u16::try_from(step * 3).unwrap_or(u16::MAX));
            }
            grid.move_cursor(*grid_move);

            // Assert
            assert!(grid.lens().contains(grid.selected_slot()));
        }
    }

    #[test]
    fn test_update_scroll_brings_selection_into_view() {
        // Arrange
        let mut grid = GridState::default();
        grid.set_width(30);
        grid.set_panels(panel_set(&["a", "b", "c", "d"], &[]));
        grid.quick_select(4);

        // Act
        let offset = grid.update_scroll(12);

        // Assert
        assert_eq!(offset, 16);
        assert_eq!(grid.scroll_offset(), 16);
    }
}
