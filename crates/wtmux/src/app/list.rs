//! Flat list view over one snapshot: worktrees, then orphan sessions, then
//! recently visited worktrees of other projects.

use ratatui::widgets::TableState;

use crate::domain::panel::SelectionKey;
use crate::domain::recent::RecentEntry;
use crate::domain::worktree::{OrphanSession, Snapshot, WorktreeState};

/// One row of the list view.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ListItem {
    Orphan(OrphanSession),
    Recent(RecentEntry),
    Worktree(WorktreeState),
}

impl ListItem {
    /// Returns the identity used to re-find this row after a refresh.
    pub fn key(&self) -> SelectionKey {
        match self {
            ListItem::Orphan(orphan) => SelectionKey::Session(orphan.name().to_string()),
            ListItem::Recent(entry) => SelectionKey::Path(entry.path.clone()),
            ListItem::Worktree(state) => SelectionKey::Path(state.working_tree.path.clone()),
        }
    }

    /// Returns whether `key` refers to this row.
    ///
    /// A worktree with a live session also answers to its session name.
    pub fn matches_key(&self, key: &SelectionKey) -> bool {
        match (self, key) {
            (ListItem::Worktree(state), SelectionKey::Session(name)) => {
                state.has_session && state.canonical_session_name == *name
            }
            _ => self.key() == *key,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ListItem::Orphan(orphan) => orphan.name(),
            ListItem::Recent(entry) => &entry.worktree,
            ListItem::Worktree(state) => &state.working_tree.name,
        }
    }

    /// Returns the session this row previews, when it has a live one.
    pub fn live_session_name(&self, snapshot: &Snapshot) -> Option<String> {
        match self {
            ListItem::Orphan(orphan) => Some(orphan.name().to_string()),
            ListItem::Recent(entry) => snapshot
                .has_live_session(&entry.session_name)
                .then(|| entry.session_name.clone()),
            ListItem::Worktree(state) => state
                .has_session
                .then(|| state.canonical_session_name.clone()),
        }
    }
}

/// Builds the list rows for `snapshot`.
///
/// Recent entries already covered by a listed worktree are skipped.
pub fn build_items(snapshot: &Snapshot, recent_entries: &[&RecentEntry]) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = snapshot
        .worktrees
        .iter()
        .cloned()
        .map(ListItem::Worktree)
        .collect();
    items.extend(snapshot.orphans.iter().cloned().map(ListItem::Orphan));
    items.extend(
        recent_entries
            .iter()
            .filter(|entry| snapshot.worktree_by_path(&entry.path).is_none())
            .map(|entry| ListItem::Recent((*entry).clone())),
    );

    items
}

/// List rows plus the table selection.
#[derive(Debug, Default)]
pub struct WorktreeList {
    items: Vec<ListItem>,
    pending_key: Option<SelectionKey>,
    pub table_state: TableState,
}

impl WorktreeList {
    /// Replaces the rows, keeping the selection on the same row when it
    /// still exists and clamping it otherwise.
    pub fn set_items(&mut self, items: Vec<ListItem>) {
        let current_key = self.selected().map(ListItem::key);
        let previous_index = self.table_state.selected();
        self.items = items;

        if let Some(pending_key) = self.pending_key.clone()
            && let Some(index) = self.position_of(&pending_key)
        {
            self.pending_key = None;
            self.table_state.select(Some(index));

            return;
        }

        if let Some(key) = current_key
            && let Some(index) = self.position_of(&key)
        {
            self.table_state.select(Some(index));

            return;
        }

        if self.items.is_empty() {
            self.table_state.select(None);

            return;
        }

        let index = previous_index.unwrap_or(0).min(self.items.len() - 1);
        self.table_state.select(Some(index));
    }

    /// Remembers `key` so the selection jumps to it once a refresh contains
    /// it.
    pub fn set_pending_key(&mut self, key: SelectionKey) {
        self.pending_key = Some(key);
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn selected(&self) -> Option<&ListItem> {
        self.table_state
            .selected()
            .and_then(|index| self.items.get(index))
    }

    /// Moves the selection down, wrapping to the top.
    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let index = match self.table_state.selected() {
            Some(index) if index + 1 < self.items.len() => index + 1,
            _ => 0,
        };
        self.table_state.select(Some(index));
    }

    /// Moves the selection up, wrapping to the bottom.
    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let index = match self.table_state.selected() {
            Some(index) if index > 0 => index - 1,
            _ => self.items.len() - 1,
        };
        self.table_state.select(Some(index));
    }

    fn position_of(&self, key: &SelectionKey) -> Option<usize> {
        self.items.iter().position(|item| item.matches_key(key))
    }
}
