use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ui::Component;
use crate::ui::style::Theme;

/// Top bar showing the app version, the project scope, and refresh health.
pub struct StatusBar {
    is_refreshing: bool,
    project_label: String,
    refresh_error: Option<String>,
    theme: Theme,
}

impl StatusBar {
    pub fn new(project_label: String, theme: Theme) -> Self {
        Self {
            is_refreshing: false,
            project_label,
            refresh_error: None,
            theme,
        }
    }

    #[must_use]
    pub fn is_refreshing(mut self, is_refreshing: bool) -> Self {
        self.is_refreshing = is_refreshing;

        self
    }

    /// Sets the error of the latest failed refresh, shown instead of the
    /// refresh indicator.
    #[must_use]
    pub fn refresh_error(mut self, refresh_error: Option<String>) -> Self {
        self.refresh_error = refresh_error;

        self
    }
}

impl Component for StatusBar {
    fn render(&self, f: &mut Frame, area: Rect) {
        let version = env!("CARGO_PKG_VERSION");
        let left_text = Span::styled(
            format!(" wtmux v{version} · {}", self.project_label),
            self.theme.accent_bold(),
        );
        let (right_text, right_style) = match (&self.refresh_error, self.is_refreshing) {
            (Some(error), _) => (
                format!("refresh failed: {error} "),
                Style::default().fg(self.theme.error),
            ),
            (None, true) => (
                "refreshing… ".to_string(),
                Style::default().fg(self.theme.warning),
            ),
            (None, false) => (String::new(), Style::default()),
        };
        let left_width = u16::try_from(left_text.width()).unwrap_or(u16::MAX);
        let right_width =
            u16::try_from(Span::raw(right_text.as_str()).width()).unwrap_or(u16::MAX);
        let padding = area
            .width
            .saturating_sub(left_width.saturating_add(right_width));
        let status_bar = Paragraph::new(Line::from(vec![
            left_text,
            Span::raw(" ".repeat(usize::from(padding))),
            Span::styled(right_text, right_style),
        ]))
        .style(
            Style::default()
                .bg(self.theme.bar_background)
                .fg(self.theme.text),
        );
        f.render_widget(status_bar, area);
    }
}
