use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::Preview;
use crate::ui::Component;
use crate::ui::style::Theme;
use crate::ui::util::tail_lines;

/// Bordered pane showing the tail of the selected session's active pane.
pub struct PreviewPane<'a> {
    preview: Option<&'a Preview>,
    session_name: Option<&'a str>,
    theme: Theme,
}

impl<'a> PreviewPane<'a> {
    pub fn new(session_name: Option<&'a str>, preview: Option<&'a Preview>, theme: Theme) -> Self {
        Self {
            preview,
            session_name,
            theme,
        }
    }
}

impl Component for PreviewPane<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let title = match self.session_name {
            Some(session_name) => format!(" Preview: {session_name} "),
            None => " Preview ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.muted_style())
            .title(Span::styled(title, Style::default().fg(self.theme.accent)));
        let visible_lines = usize::from(block.inner(area).height);

        let lines: Vec<Line<'_>> = match (self.session_name, self.preview) {
            (None, _) => vec![Line::from(Span::styled(
                "No live session",
                self.theme.muted_style(),
            ))],
            (Some(_), None) => vec![Line::from(Span::styled(
                "Capturing…",
                self.theme.muted_style(),
            ))],
            (Some(_), Some(preview)) => tail_lines(&preview.content, visible_lines)
                .into_iter()
                .map(Line::from)
                .collect(),
        };

        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn rendered_text(pane: &PreviewPane<'_>) -> String {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        terminal
            .draw(|f| {
                let area = f.area();
                pane.render(f, area);
            })
            .expect("failed to draw");

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_preview_pane_keeps_last_lines_that_fit() {
        // Arrange
        let preview = Preview {
            content: "line 1\nline 2\nline 3\nline 4\nline 5\n\n".to_string(),
            session_name: "app-login".to_string(),
        };
        let pane = PreviewPane::new(Some("app-login"), Some(&preview), Theme::DEFAULT);

        // Act
        let text = rendered_text(&pane);

        // Assert
        assert!(text.contains("Preview: app-login"));
        assert!(text.contains("line 5"));
        assert!(text.contains("line 3"));
        assert!(!text.contains("line 2"));
    }

    #[test]
    fn test_preview_pane_without_session_shows_placeholder() {
        // Arrange
        let pane = PreviewPane::new(None, None, Theme::DEFAULT);

        // Act
        let text = rendered_text(&pane);

        // Assert
        assert!(text.contains("No live session"));
    }
}
