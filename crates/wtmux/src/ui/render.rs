use std::path::Path;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::app::Preview;
use crate::app::grid::GridState;
use crate::app::list::WorktreeList;
use crate::app::notification::Notification;
use crate::domain::worktree::Snapshot;
use crate::ui::state::app_mode::AppMode;
use crate::ui::style::Theme;
use crate::ui::{components, router};

/// A trait for UI pages that enforces a standard rendering interface.
pub trait Page {
    /// Renders a page in the provided frame and area.
    fn render(&mut self, f: &mut Frame, area: Rect);
}

/// A trait for UI components that enforces a standard rendering interface.
pub trait Component {
    /// Renders a component in the provided frame and area.
    fn render(&self, f: &mut Frame, area: Rect);
}

/// Borrowed data required to draw a single UI frame.
///
/// The grid and list are mutable because drawing them updates their column
/// count, scroll offset, and table offset.
pub struct RenderContext<'a> {
    pub grid: &'a mut GridState,
    pub is_refreshing: bool,
    pub list: &'a mut WorktreeList,
    pub mode: &'a AppMode,
    pub notification: Option<&'a Notification>,
    pub preview: Option<&'a Preview>,
    pub project_label: String,
    pub refresh_error: Option<&'a str>,
    pub snapshot: &'a Snapshot,
    pub theme: Theme,
    pub working_dir: &'a Path,
}

/// Renders a complete frame including status bar, content area, and footer.
pub fn render(f: &mut Frame, context: RenderContext<'_>) {
    let area = f.area();
    let outer_chunks = Layout::default()
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar_area = outer_chunks[0];
    let content_area = outer_chunks[1];
    let footer_bar_area = outer_chunks[2];

    components::status_bar::StatusBar::new(context.project_label.clone(), context.theme)
        .is_refreshing(context.is_refreshing)
        .refresh_error(context.refresh_error.map(str::to_string))
        .render(f, status_bar_area);
    components::footer_bar::FooterBar::new(context.working_dir, context.theme)
        .view(context.mode.view())
        .render(f, footer_bar_area);

    router::route_frame(f, content_area, context);
}
