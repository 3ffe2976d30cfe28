use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::ui::Component;
use crate::ui::style::Theme;
use crate::ui::util::centered_rect;

const OVERLAY_HEIGHT: u16 = 6;
const OVERLAY_MIN_WIDTH: u16 = 40;
const OVERLAY_WIDTH_PERCENT: u16 = 50;
const INPUT_PREFIX: &str = " > ";

/// Prompt for the name of a new worktree.
pub struct NameInputOverlay<'a> {
    input: &'a str,
    is_loading: bool,
    repository_name: &'a str,
    theme: Theme,
}

impl<'a> NameInputOverlay<'a> {
    pub fn new(repository_name: &'a str, input: &'a str, is_loading: bool, theme: Theme) -> Self {
        Self {
            input,
            is_loading,
            repository_name,
            theme,
        }
    }
}

impl Component for NameInputOverlay<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(
            area,
            (OVERLAY_WIDTH_PERCENT, 0),
            (OVERLAY_MIN_WIDTH, OVERLAY_HEIGHT),
        );
        let hint = if self.is_loading {
            Span::styled(" Loading branches…", Style::default().fg(self.theme.warning))
        } else {
            Span::styled(" Enter: choose base branch | Esc: cancel", self.theme.muted_style())
        };
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(INPUT_PREFIX, Style::default().fg(self.theme.accent)),
                Span::styled(self.input, Style::default().fg(self.theme.text)),
            ]),
            Line::from(""),
            Line::from(hint),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.accent))
                .title(Span::styled(
                    format!(" New worktree in {} ", self.repository_name),
                    self.theme.accent_bold(),
                )),
        );

        f.render_widget(Clear, popup_area);
        f.render_widget(paragraph, popup_area);

        if !self.is_loading {
            let cursor_x = popup_area
                .x
                .saturating_add(1)
                .saturating_add(u16::try_from(INPUT_PREFIX.width()).unwrap_or(0))
                .saturating_add(u16::try_from(self.input.width()).unwrap_or(0));
            f.set_cursor_position((cursor_x, popup_area.y.saturating_add(2)));
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn rendered_text(overlay: &NameInputOverlay<'_>) -> String {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        terminal
            .draw(|f| {
                let area = f.area();
                overlay.render(f, area);
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
    fn test_name_input_overlay_shows_repository_and_input() {
        // Arrange
        let overlay = NameInputOverlay::new("app", "login", false, Theme::DEFAULT);

        // Act
        let text = rendered_text(&overlay);

        // Assert
        assert!(text.contains("New worktree in app"));
        assert!(text.contains("> login"));
        assert!(text.contains("Enter: choose base branch"));
    }

    #[test]
    fn test_name_input_overlay_shows_loading_hint() {
        // Arrange
        let overlay = NameInputOverlay::new("app", "login", true, Theme::DEFAULT);

        // Act
        let text = rendered_text(&overlay);

        // Assert
        assert!(text.contains("Loading branches…"));
    }
}
