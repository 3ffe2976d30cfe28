use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use crate::ui::Component;
use crate::ui::state::picker::BranchPicker;
use crate::ui::style::Theme;
use crate::ui::util::centered_rect;

const OVERLAY_SIZE_PERCENT: (u16, u16) = (50, 60);
const OVERLAY_MIN_SIZE: (u16, u16) = (40, 10);

/// Filterable branch list for choosing a base branch.
pub struct BranchPickerOverlay<'a> {
    picker: &'a BranchPicker,
    theme: Theme,
    title: String,
}

impl<'a> BranchPickerOverlay<'a> {
    pub fn new(title: String, picker: &'a BranchPicker, theme: Theme) -> Self {
        Self {
            picker,
            theme,
            title,
        }
    }

    fn render_branches(&self, f: &mut Frame, area: Rect) {
        if self.picker.is_loading {
            let loading = Paragraph::new(Line::from(Span::styled(
                " Loading branches…",
                Style::default().fg(self.theme.warning),
            )));
            f.render_widget(loading, area);

            return;
        }

        let filtered = self.picker.filtered();
        if filtered.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                " No matching branches",
                self.theme.muted_style(),
            )));
            f.render_widget(empty, area);

            return;
        }

        let items: Vec<ListItem<'_>> = filtered
            .into_iter()
            .map(|branch| ListItem::new(Line::from(format!(" {branch}"))))
            .collect();
        let list = List::new(items)
            .style(Style::default().fg(self.theme.text))
            .highlight_style(self.theme.accent_bold())
            .highlight_symbol(">>");
        let mut state = ListState::default();
        state.select(Some(self.picker.selected_index));
        f.render_stateful_widget(list, area, &mut state);
    }
}

impl Component for BranchPickerOverlay<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(area, OVERLAY_SIZE_PERCENT, OVERLAY_MIN_SIZE);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .title(Span::styled(format!(" {} ", self.title), self.theme.accent_bold()));
        let inner = block.inner(popup_area);

        f.render_widget(Clear, popup_area);
        f.render_widget(block, popup_area);

        let chunks = Layout::default()
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let filter_line = Line::from(vec![
            Span::styled(" filter: ", self.theme.muted_style()),
            Span::styled(self.picker.filter.as_str(), Style::default().fg(self.theme.text)),
        ]);
        f.render_widget(Paragraph::new(filter_line), chunks[0]);
        self.render_branches(f, chunks[1]);
        f.render_widget(
            Paragraph::new(Span::styled(
                " Enter: select | Esc: cancel",
                self.theme.muted_style(),
            )),
            chunks[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn rendered_text(overlay: &BranchPickerOverlay<'_>) -> String {
        let backend = TestBackend::new(80, 20);
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
    fn test_branch_picker_overlay_shows_loading_state() {
        // Arrange
        let picker = BranchPicker::loading();
        let overlay = BranchPickerOverlay::new("Base branch".to_string(), &picker, Theme::DEFAULT);

        // Act
        let text = rendered_text(&overlay);

        // Assert
        assert!(text.contains("Loading branches…"));
    }

    #[test]
    fn test_branch_picker_overlay_highlights_filtered_selection() {
        // Arrange
        let mut picker = BranchPicker::loaded(vec![
            "main".to_string(),
            "feature/login".to_string(),
            "release".to_string(),
        ]);
        picker.push_filter_char('e');
        picker.next();
        let overlay = BranchPickerOverlay::new("Base branch".to_string(), &picker, Theme::DEFAULT);

        // Act
        let text = rendered_text(&overlay);

        // Assert
        assert!(text.contains("filter: e"));
        assert!(text.contains(">> release"));
        assert!(!text.contains("main"));
    }

    #[test]
    fn test_branch_picker_overlay_reports_no_matches() {
        // Arrange
        let mut picker = BranchPicker::loaded(vec!["main".to_string()]);
        picker.push_filter_char('z');
        let overlay = BranchPickerOverlay::new("Base branch".to_string(), &picker, Theme::DEFAULT);

        // Act
        let text = rendered_text(&overlay);

        // Assert
        assert!(text.contains("No matching branches"));
    }
}
