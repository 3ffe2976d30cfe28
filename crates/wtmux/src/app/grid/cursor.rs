//! Cursor movement over the grid's sectioned, column-wrapped layout.
//!
//! Movement functions are pure: they take the current [`Slot`], the filtered
//! section sizes, and the column count, and return the next slot.

/// Cursor index of the "start new worktree" action.
pub const NEW_WORKTREE_INDEX: isize = -1;
/// Cursor index of the "switch to list view" action.
pub const LIST_VIEW_INDEX: isize = -2;

/// Number of data sections (sessions, recent, available).
const SECTION_COUNT: usize = 3;
const SESSIONS_SECTION: usize = 0;
const RECENT_SECTION: usize = 1;
const AVAILABLE_SECTION: usize = 2;

/// Grid selection as stored between frames.
///
/// `index` addresses the filtered sessions+recent sequence, or one of the
/// negative action sentinels. The available section keeps its own index so
/// returning to it lands where the user left off.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NavigationCursor {
    pub available_index: usize,
    pub in_available: bool,
    pub index: isize,
}

impl Default for NavigationCursor {
    fn default() -> Self {
        Self {
            available_index: 0,
            in_available: false,
            index: NEW_WORKTREE_INDEX,
        }
    }
}

impl NavigationCursor {
    /// Decodes the stored cursor into a [`Slot`].
    pub fn slot(&self) -> Slot {
        if self.in_available {
            return Slot::Available(self.available_index);
        }

        match self.index {
            LIST_VIEW_INDEX => Slot::ListView,
            index => usize::try_from(index).map_or(Slot::NewWorktree, Slot::Panel),
        }
    }

    /// Moves the cursor to `slot`, keeping the available index when leaving
    /// the available section.
    pub fn set_slot(&mut self, slot: Slot) {
        match slot {
            Slot::NewWorktree => {
                self.in_available = false;
                self.index = NEW_WORKTREE_INDEX;
            }
            Slot::ListView => {
                self.in_available = false;
                self.index = LIST_VIEW_INDEX;
            }
            Slot::Panel(index) => {
                self.in_available = false;
                self.index = isize::try_from(index).unwrap_or(NEW_WORKTREE_INDEX);
            }
            Slot::Available(index) => {
                self.in_available = true;
                self.available_index = index;
            }
        }
    }
}

/// One selectable position in the grid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot {
    NewWorktree,
    ListView,
    /// Position in the filtered sessions+recent sequence.
    Panel(usize),
    /// Position in the filtered available sequence.
    Available(usize),
}

/// Filtered item counts of each data section.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SectionLens {
    pub available: usize,
    pub recent: usize,
    pub sessions: usize,
}

impl SectionLens {
    /// Number of slots in the filtered sessions+recent sequence.
    pub fn panels(&self) -> usize {
        self.sessions + self.recent
    }

    /// Number of selectable slots, actions included.
    fn total(&self) -> usize {
        2 + self.panels() + self.available
    }

    fn section_len(&self, section: usize) -> usize {
        match section {
            SESSIONS_SECTION => self.sessions,
            RECENT_SECTION => self.recent,
            _ => self.available,
        }
    }

    /// Returns whether `slot` points at something that exists.
    pub fn contains(&self, slot: Slot) -> bool {
        match slot {
            Slot::NewWorktree | Slot::ListView => true,
            Slot::Panel(index) => index < self.panels(),
            Slot::Available(index) => index < self.available,
        }
    }

    fn locate(&self, slot: Slot) -> Option<(usize, usize)> {
        match slot {
            Slot::NewWorktree | Slot::ListView => None,
            Slot::Panel(index) if index < self.sessions => Some((SESSIONS_SECTION, index)),
            Slot::Panel(index) => Some((RECENT_SECTION, index - self.sessions)),
            Slot::Available(index) => Some((AVAILABLE_SECTION, index)),
        }
    }

    fn slot_in(&self, section: usize, offset: usize) -> Slot {
        match section {
            SESSIONS_SECTION => Slot::Panel(offset),
            RECENT_SECTION => Slot::Panel(self.sessions + offset),
            _ => Slot::Available(offset),
        }
    }

    /// Position of `slot` in the flattened order: actions, panels,
    /// available.
    pub fn position(&self, slot: Slot) -> usize {
        match slot {
            Slot::NewWorktree => 0,
            Slot::ListView => 1,
            Slot::Panel(index) => 2 + index,
            Slot::Available(index) => 2 + self.panels() + index,
        }
    }

    /// Inverse of [`SectionLens::position`]; out-of-range positions clamp to
    /// the last slot.
    pub fn slot_at(&self, position: usize) -> Slot {
        let position = position.min(self.total() - 1);
        match position {
            0 => Slot::NewWorktree,
            1 => Slot::ListView,
            position if position - 2 < self.panels() => Slot::Panel(position - 2),
            position => Slot::Available(position - 2 - self.panels()),
        }
    }
}

/// Steps one slot forward without wrapping.
pub fn move_right(slot: Slot, lens: SectionLens) -> Slot {
    let position = lens.position(slot);

    lens.slot_at((position + 1).min(lens.total() - 1))
}

/// Steps one slot backward without wrapping.
pub fn move_left(slot: Slot, lens: SectionLens) -> Slot {
    lens.slot_at(lens.position(slot).saturating_sub(1))
}

/// Steps one slot forward through the flattened order, wrapping to the
/// first action.
pub fn move_next(slot: Slot, lens: SectionLens) -> Slot {
    lens.slot_at((lens.position(slot) + 1) % lens.total())
}

/// Steps one slot backward through the flattened order, wrapping to the
/// last slot.
pub fn move_previous(slot: Slot, lens: SectionLens) -> Slot {
    let total = lens.total();

    lens.slot_at((lens.position(slot) + total - 1) % total)
}

/// Moves one row down, crossing into the next non-empty section with the
/// column preserved (clamped) when the current section has no row below.
/// With nothing below, lands on the list-view action.
pub fn move_down(slot: Slot, lens: SectionLens, columns: usize) -> Slot {
    let columns = columns.max(1);
    let Some((section, offset)) = lens.locate(slot) else {
        let column = usize::from(slot == Slot::ListView);

        return first_row_slot(lens, 0, column).unwrap_or(slot);
    };

    let below = offset + columns;
    if below < lens.section_len(section) {
        return lens.slot_in(section, below);
    }

    first_row_slot(lens, section + 1, offset % columns).unwrap_or(Slot::ListView)
}

/// Moves one row up, crossing into the last row of the previous non-empty
/// section with the column preserved (clamped). From a first row with
/// nothing above, lands on the action in the same column.
pub fn move_up(slot: Slot, lens: SectionLens, columns: usize) -> Slot {
    let columns = columns.max(1);
    let Some((section, offset)) = lens.locate(slot) else {
        return slot;
    };

    if offset >= columns {
        return lens.slot_in(section, offset - columns);
    }

    let column = offset % columns;
    for previous in (0..section).rev() {
        let len = lens.section_len(previous);
        if len == 0 {
            continue;
        }
        let last_row_start = ((len - 1) / columns) * columns;

        return lens.slot_in(previous, (last_row_start + column).min(len - 1));
    }

    if column == 0 {
        Slot::NewWorktree
    } else {
        Slot::ListView
    }
}

/// Returns the slot at `column` (clamped) in the first row of the first
/// non-empty section at or after `from_section`.
fn first_row_slot(lens: SectionLens, from_section: usize, column: usize) -> Option<Slot> {
    (from_section..SECTION_COUNT).find_map(|section| {
        let len = lens.section_len(section);
        if len == 0 {
            return None;
        }

        Some(lens.slot_in(section, column.min(len - 1)))
    })
}
