use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ui::Component;
use crate::ui::state::app_mode::View;
use crate::ui::style::Theme;
use crate::ui::util::centered_rect;

const OVERLAY_SIZE_PERCENT: (u16, u16) = (60, 60);
const OVERLAY_MIN_SIZE: (u16, u16) = (30, 10);

/// Centered popup listing the keybindings of the view underneath.
pub struct HelpOverlay {
    scroll_offset: u16,
    theme: Theme,
    view: View,
}

impl HelpOverlay {
    pub fn new(view: View, scroll_offset: u16, theme: Theme) -> Self {
        Self {
            scroll_offset,
            theme,
            view,
        }
    }
}

impl Component for HelpOverlay {
    fn render(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(area, OVERLAY_SIZE_PERCENT, OVERLAY_MIN_SIZE);

        f.render_widget(Clear, popup_area);

        let bindings = self.view.keybindings();
        let key_width = bindings.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

        let mut lines: Vec<Line<'_>> = Vec::with_capacity(bindings.len() + 3);
        lines.push(Line::from(""));
        for (key, description) in bindings {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{key:>key_width$}"), self.theme.accent_bold()),
                Span::styled(": ", Style::default().fg(self.theme.text)),
                Span::styled(*description, Style::default().fg(self.theme.text)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Press ? / q / Esc to close",
            self.theme.muted_style(),
        )));

        let title = format!(" {} ", self.view.title());
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.accent))
                    .title(Span::styled(
                        title,
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )),
            )
            .scroll((self.scroll_offset, 0));

        f.render_widget(paragraph, popup_area);
    }
}
