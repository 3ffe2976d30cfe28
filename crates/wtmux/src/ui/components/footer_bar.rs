use std::path::Path;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ui::Component;
use crate::ui::state::app_mode::View;
use crate::ui::style::Theme;
use crate::ui::util::display_path;

const HINT_COUNT: usize = 5;

/// Bottom bar with the launch directory and the first few keybindings of
/// the current view.
pub struct FooterBar {
    theme: Theme,
    view: View,
    working_dir: String,
}

impl FooterBar {
    pub fn new(working_dir: &Path, theme: Theme) -> Self {
        Self {
            theme,
            view: View::default(),
            working_dir: display_path(working_dir),
        }
    }

    #[must_use]
    pub fn view(mut self, view: View) -> Self {
        self.view = view;

        self
    }

    fn hint_text(&self) -> String {
        let mut hints: Vec<String> = self
            .view
            .keybindings()
            .iter()
            .take(HINT_COUNT)
            .map(|(key, description)| format!("{key}: {}", description.to_lowercase()))
            .collect();
        hints.push("?: help".to_string());
        hints.dedup();

        format!("{} ", hints.join(" | "))
    }
}

impl Component for FooterBar {
    fn render(&self, f: &mut Frame, area: Rect) {
        let left_text = format!(" {}", self.working_dir);
        let hint_text = self.hint_text();
        let total_width = usize::from(area.width);

        let mut spans = vec![Span::styled(
            left_text.clone(),
            Style::default()
                .fg(self.theme.text)
                .add_modifier(Modifier::DIM),
        )];
        let used_width =
            Span::raw(left_text.as_str()).width() + Span::raw(hint_text.as_str()).width();
        if used_width < total_width {
            spans.push(Span::raw(" ".repeat(total_width - used_width)));
            spans.push(Span::styled(hint_text, Style::default().fg(self.theme.text)));
        }

        let footer = Paragraph::new(Line::from(spans)).style(
            Style::default()
                .bg(self.theme.bar_background)
                .fg(self.theme.text),
        );
        f.render_widget(footer, area);
    }
}
