use std::io;

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::runtime::TuiTerminal;

/// Owns raw mode and the alternate screen for the lifetime of the
/// dashboard; dropping it hands the terminal back to the shell, including
/// on early `?` returns and panics.
pub(crate) struct TerminalGuard;

impl TerminalGuard {
    /// Switches the terminal into dashboard mode.
    ///
    /// The guard is created before the first fallible step so a partial
    /// setup is still undone.
    pub(crate) fn enter() -> io::Result<(Self, TuiTerminal)> {
        let guard = Self;
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        Ok((guard, terminal))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}
