#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PaletteFocus {
    Input,
    Dropdown,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PaletteCommand {
    Help,
    NewWorktree,
    Quit,
    Refresh,
    ToggleGrid,
}

impl PaletteCommand {
    pub const ALL: &[PaletteCommand] = &[
        PaletteCommand::Help,
        PaletteCommand::NewWorktree,
        PaletteCommand::Quit,
        PaletteCommand::Refresh,
        PaletteCommand::ToggleGrid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaletteCommand::Help => "help",
            PaletteCommand::NewWorktree => "new worktree",
            PaletteCommand::Quit => "quit",
            PaletteCommand::Refresh => "refresh",
            PaletteCommand::ToggleGrid => "toggle grid",
        }
    }

    pub fn filter(query: &str) -> Vec<PaletteCommand> {
        let query_lower = query.to_lowercase();
        let mut results: Vec<PaletteCommand> = Self::ALL
            .iter()
            .filter(|cmd| cmd.label().contains(&query_lower))
            .copied()
            .collect();
        results.sort_by_key(|cmd| cmd.label());
        results
    }
}
