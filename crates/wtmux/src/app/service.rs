//! Shared app dependency container for background tasks.

use tokio::sync::mpsc;

use crate::app::AppEvent;
use crate::app::reconcile::Reconciler;

/// Shared app dependencies used by background tasks.
pub struct AppServices {
    event_tx: mpsc::UnboundedSender<AppEvent>,
    preview_lines: usize,
    reconciler: Reconciler,
}

impl AppServices {
    pub(crate) fn new(
        event_tx: mpsc::UnboundedSender<AppEvent>,
        preview_lines: usize,
        reconciler: Reconciler,
    ) -> Self {
        Self {
            event_tx,
            preview_lines,
            reconciler,
        }
    }

    /// Returns a clone of the app event sender.
    pub(crate) fn event_sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_tx.clone()
    }

    /// Returns how many pane lines a preview captures.
    pub(crate) fn preview_lines(&self) -> usize {
        self.preview_lines
    }

    pub(crate) fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }
}
