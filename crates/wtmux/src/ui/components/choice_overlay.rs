use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ui::Component;
use crate::ui::style::Theme;
use crate::ui::util::{centered_rect, truncate_with_ellipsis};

const MIN_OVERLAY_WIDTH: u16 = 36;
const OVERLAY_WIDTH_PERCENT: u16 = 40;

/// Centered single-choice list used by action menus and the repository
/// picker.
pub struct ChoiceOverlay {
    items: Vec<String>,
    selected_index: usize,
    theme: Theme,
    title: String,
}

impl ChoiceOverlay {
    pub fn new(title: String, items: Vec<String>, selected_index: usize, theme: Theme) -> Self {
        Self {
            items,
            selected_index,
            theme,
            title,
        }
    }
}

impl Component for ChoiceOverlay {
    fn render(&self, f: &mut Frame, area: Rect) {
        // Items, the hint line, a spacer, and the border.
        let height = u16::try_from(self.items.len())
            .unwrap_or(u16::MAX)
            .saturating_add(4);
        let popup_area = centered_rect(
            area,
            (OVERLAY_WIDTH_PERCENT, 0),
            (MIN_OVERLAY_WIDTH, height),
        );
        let inner_width = usize::from(popup_area.width.saturating_sub(5));

        let mut lines: Vec<Line<'_>> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let is_selected = index == self.selected_index;
                let prefix = if is_selected { ">> " } else { "   " };
                let style = if is_selected {
                    self.theme.accent_bold()
                } else {
                    Style::default().fg(self.theme.text)
                };

                Line::from(Span::styled(
                    format!("{prefix}{}", truncate_with_ellipsis(item, inner_width)),
                    style,
                ))
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "   Enter: select | Esc: cancel",
            self.theme.muted_style(),
        )));

        let title = truncate_with_ellipsis(&self.title, inner_width);
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.accent))
                .title(Span::styled(format!(" {title} "), self.theme.accent_bold())),
        );

        f.render_widget(Clear, popup_area);
        f.render_widget(paragraph, popup_area);
    }
}
