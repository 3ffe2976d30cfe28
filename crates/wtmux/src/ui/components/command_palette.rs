use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::ui::Component;
use crate::ui::state::palette::{PaletteCommand, PaletteFocus};
use crate::ui::style::Theme;

const INPUT_PREFIX: &str = "> / ";

/// Bottom-anchored command input with a dropdown of matching commands.
pub struct CommandPaletteInput<'a> {
    focus: PaletteFocus,
    input: &'a str,
    selected_index: usize,
    theme: Theme,
}

impl<'a> CommandPaletteInput<'a> {
    pub fn new(input: &'a str, selected_index: usize, focus: PaletteFocus, theme: Theme) -> Self {
        Self {
            focus,
            input,
            selected_index,
            theme,
        }
    }
}

impl Component for CommandPaletteInput<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let filtered = PaletteCommand::filter(self.input);
        let dropdown_height = if filtered.is_empty() {
            0
        } else {
            u16::try_from(filtered.len()).unwrap_or(0) + 2
        };

        let chunks = Layout::default()
            .constraints([
                Constraint::Min(0),
                Constraint::Length(dropdown_height),
                Constraint::Length(1),
            ])
            .split(area);
        let dropdown_area = chunks[1];
        let input_area = chunks[2];

        if !filtered.is_empty() {
            let rows: Vec<Line> = filtered
                .iter()
                .enumerate()
                .map(|(index, command)| {
                    let is_selected =
                        self.focus == PaletteFocus::Dropdown && index == self.selected_index;
                    let prefix = if is_selected { ">> " } else { "   " };
                    let style = if is_selected {
                        self.theme.accent_bold()
                    } else {
                        self.theme.muted_style()
                    };

                    Line::from(Span::styled(format!("{prefix}{}", command.label()), style))
                })
                .collect();

            let dropdown = Paragraph::new(rows).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.muted_style()),
            );
            f.render_widget(Clear, dropdown_area);
            f.render_widget(dropdown, dropdown_area);
        }

        let input_line = Line::from(vec![
            Span::styled(INPUT_PREFIX, Style::default().fg(self.theme.accent)),
            Span::raw(self.input),
        ]);
        f.render_widget(Clear, input_area);
        f.render_widget(Paragraph::new(input_line), input_area);

        let cursor_x = input_area
            .x
            .saturating_add(u16::try_from(INPUT_PREFIX.width()).unwrap_or(0))
            .saturating_add(u16::try_from(self.input.width()).unwrap_or(0));
        f.set_cursor_position((cursor_x, input_area.y));
    }
}
