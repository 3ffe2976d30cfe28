use std::io;
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::info;

use crate::app::App;
use crate::ui;

mod event;
mod key_handler;
pub mod mode;
mod terminal;

pub(crate) type TuiTerminal = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum EventResult {
    Continue,
    Quit,
}

/// Timer periods driving background work.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeTimers {
    pub preview_interval: Duration,
    pub refresh_interval: Duration,
}

/// Runs the TUI event/render loop until the user exits.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails.
pub async fn run(app: &mut App, timers: RuntimeTimers) -> io::Result<()> {
    let (_terminal_guard, mut terminal) = terminal::TerminalGuard::enter()?;

    // Terminal input is read on its own thread so the async loop never
    // blocks on `crossterm::event::read`.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    event::spawn_event_reader(event_tx);

    let mut ticks = event::Ticks::new(timers);
    info!("Dashboard started");

    run_main_loop(app, &mut terminal, &mut event_rx, &mut ticks).await?;

    terminal.show_cursor()?;
    info!("Dashboard closed");

    Ok(())
}

async fn run_main_loop(
    app: &mut App,
    terminal: &mut TuiTerminal,
    event_rx: &mut mpsc::UnboundedReceiver<crossterm::event::Event>,
    ticks: &mut event::Ticks,
) -> io::Result<()> {
    loop {
        render_frame(app, terminal)?;

        if event::process_events(app, event_rx, ticks).await == EventResult::Quit {
            break;
        }
    }

    Ok(())
}

fn render_frame(app: &mut App, terminal: &mut TuiTerminal) -> io::Result<()> {
    terminal.draw(|frame| ui::render(frame, app.render_context()))?;

    Ok(())
}
