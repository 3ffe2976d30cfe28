use std::time::Duration;

use crossterm::event::{Event, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

use crate::app::App;
use crate::runtime::{EventResult, RuntimeTimers, key_handler};

/// Refresh and preview timers polled by the main loop.
pub(crate) struct Ticks {
    preview: Interval,
    refresh: Interval,
}

impl Ticks {
    pub(crate) fn new(timers: RuntimeTimers) -> Self {
        let mut preview = tokio::time::interval(timers.preview_interval);
        preview.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut refresh = tokio::time::interval(timers.refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self { preview, refresh }
    }
}

pub(crate) fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) {
    std::thread::spawn(move || {
        loop {
            match crossterm::event::poll(Duration::from_millis(250)) {
                Ok(true) => {
                    if let Ok(event) = crossterm::event::read()
                        && event_tx.send(event).is_err()
                    {
                        break;
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
    });
}

/// Waits for one wake-up source and applies everything that is ready.
///
/// The first tick of each timer fires immediately, so the first pass
/// dispatches the initial refresh.
pub(crate) async fn process_events(
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    ticks: &mut Ticks,
) -> EventResult {
    enum LoopSignal {
        AppEvent(Option<crate::app::AppEvent>),
        PreviewTick,
        RefreshTick,
        Terminal(Option<Event>),
    }

    let signal = tokio::select! {
        biased;
        event = event_rx.recv() => LoopSignal::Terminal(event),
        app_event = app.next_app_event() => LoopSignal::AppEvent(app_event),
        _ = ticks.refresh.tick() => LoopSignal::RefreshTick,
        _ = ticks.preview.tick() => LoopSignal::PreviewTick,
    };

    match signal {
        LoopSignal::AppEvent(Some(app_event)) => app.apply_app_events(app_event),
        LoopSignal::AppEvent(None) => {}
        LoopSignal::PreviewTick => app.request_preview(),
        LoopSignal::RefreshTick => {
            app.request_refresh();
        }
        LoopSignal::Terminal(None) => return EventResult::Quit,
        LoopSignal::Terminal(Some(event)) => {
            if process_event(app, event) == EventResult::Quit {
                return EventResult::Quit;
            }
        }
    }

    // Drain queued key presses before re-rendering so fast typing is not
    // processed one key per frame.
    while let Ok(event) = event_rx.try_recv() {
        if process_event(app, event) == EventResult::Quit {
            return EventResult::Quit;
        }
    }

    EventResult::Continue
}

fn process_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            key_handler::handle_key_event(app, key)
        }
        _ => EventResult::Continue,
    }
}
