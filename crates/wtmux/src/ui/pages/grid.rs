use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::grid::GridState;
use crate::app::grid::cursor::Slot;
use crate::app::grid::scroll::{ACTIONS_HEIGHT, PANEL_HEIGHT, SECTION_HEADER_HEIGHT, row_count};
use crate::domain::panel::GridPanel;
use crate::ui::Page;
use crate::ui::style::Theme;
use crate::ui::util::{format_age, truncate_with_ellipsis};

/// Highest number reachable through digit quick-select.
const QUICK_SELECT_MAX: usize = 9;

/// Maps logical grid lines onto the visible part of the content area.
#[derive(Clone, Copy)]
struct Viewport {
    area: Rect,
    offset: usize,
}

impl Viewport {
    /// Returns the screen rect of logical lines `[start, start + height)`,
    /// or `None` unless the whole range is on screen.
    fn rect(self, start: usize, height: usize, x: u16, width: u16) -> Option<Rect> {
        let top = start.checked_sub(self.offset)?;
        if top + height > usize::from(self.area.height) {
            return None;
        }

        Some(Rect::new(
            x,
            self.area.y + u16::try_from(top).ok()?,
            width,
            u16::try_from(height).ok()?,
        ))
    }
}

/// One titled section of panels sharing a slot mapping.
struct Section<'a> {
    /// Quick-select number of the first panel minus one.
    number_base: usize,
    panels: Vec<&'a GridPanel>,
    slot_of: fn(usize, usize) -> Slot,
    /// Passed to `slot_of` alongside the panel index.
    slot_base: usize,
    title: &'static str,
}

/// Sectioned card grid over sessions, recent entries, and available
/// worktrees.
pub struct GridPage<'a> {
    grid: &'a mut GridState,
    theme: Theme,
}

impl<'a> GridPage<'a> {
    pub fn new(grid: &'a mut GridState, theme: Theme) -> Self {
        Self { grid, theme }
    }

    fn render_filter_bar(&self, f: &mut Frame, area: Rect) {
        let grid = &*self.grid;
        let lens = grid.lens();
        let visible = lens.panels() + lens.available;
        let prefix = "/ ";
        let line = Line::from(vec![
            Span::styled(prefix, self.theme.accent_bold()),
            Span::styled(grid.filter_text(), Style::default().fg(self.theme.text)),
            Span::styled(
                format!("  ({visible} of {})", grid.total_panels()),
                self.theme.muted_style(),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);

        if grid.is_filter_editing() {
            let text_width = prefix.width() + grid.filter_text().width();
            let cursor_x = area
                .x
                .saturating_add(u16::try_from(text_width).unwrap_or(u16::MAX));
            f.set_cursor_position((cursor_x, area.y));
        }
    }

    fn render_actions(&self, f: &mut Frame, viewport: Viewport) {
        let Some(row) = viewport.rect(
            0,
            ACTIONS_HEIGHT,
            viewport.area.x,
            viewport.area.width,
        ) else {
            return;
        };
        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row);
        let selected = self.grid.selected_slot();

        for (label, slot, area) in [
            ("[+] New worktree", Slot::NewWorktree, buttons[0]),
            ("[≡] List view", Slot::ListView, buttons[1]),
        ] {
            let is_selected = selected == slot;
            let style = if is_selected {
                self.theme.accent_bold()
            } else {
                Style::default().fg(self.theme.text)
            };
            let button = Paragraph::new(Span::styled(label, style))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(self.theme.border(is_selected)),
                );
            f.render_widget(button, area);
        }
    }

    /// Draws one section starting at logical `line` and returns its height.
    fn render_section(
        &self,
        f: &mut Frame,
        viewport: Viewport,
        line: usize,
        section: &Section<'_>,
        now: i64,
    ) -> usize {
        if section.panels.is_empty() {
            return 0;
        }

        let columns = self.grid.columns().max(1);
        let selected = self.grid.selected_slot();
        if let Some(header_area) =
            viewport.rect(line, SECTION_HEADER_HEIGHT, viewport.area.x, viewport.area.width)
        {
            let header = Span::styled(
                format!(" {} ({})", section.title, section.panels.len()),
                self.theme.accent_bold(),
            );
            f.render_widget(Paragraph::new(header), header_area);
        }

        let column_width = viewport.area.width / u16::try_from(columns).unwrap_or(1);
        for (index, panel) in section.panels.iter().enumerate() {
            let row = index / columns;
            let column = u16::try_from(index % columns).unwrap_or(0);
            let start = line + SECTION_HEADER_HEIGHT + row * PANEL_HEIGHT;
            let x = viewport.area.x + column * column_width;
            let Some(area) = viewport.rect(start, PANEL_HEIGHT, x, column_width) else {
                continue;
            };
            let is_selected = selected == (section.slot_of)(section.slot_base, index);
            let number = section.number_base + index + 1;

            self.render_panel(f, area, panel, number, is_selected, now);
        }

        SECTION_HEADER_HEIGHT + row_count(section.panels.len(), columns) * PANEL_HEIGHT
    }

    fn render_panel(
        &self,
        f: &mut Frame,
        area: Rect,
        panel: &GridPanel,
        number: usize,
        is_selected: bool,
        now: i64,
    ) {
        let inner_width = usize::from(area.width.saturating_sub(2));
        let title = if number <= QUICK_SELECT_MAX {
            format!(" [{number}] {} ", panel.display_name)
        } else {
            format!(" {} ", panel.display_name)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(is_selected))
            .title(Span::styled(
                truncate_with_ellipsis(&title, inner_width),
                if is_selected {
                    self.theme.accent_bold()
                } else {
                    Style::default().fg(self.theme.text)
                },
            ));

        let branch = if panel.branch.is_empty() {
            "-"
        } else {
            panel.branch.as_str()
        };
        let session_line = if panel.has_session {
            Span::styled(
                format!(
                    "● {} {}w {}p",
                    panel.session_name, panel.window_count, panel.pane_count
                ),
                Style::default().fg(self.theme.session),
            )
        } else {
            Span::styled("○ no session", self.theme.muted_style())
        };
        let status_line = if panel.is_orphan {
            Span::styled("orphan session", Style::default().fg(self.theme.orphan))
        } else if panel.is_recent {
            Span::styled(
                format!("recent · {}", panel.repo_name),
                Style::default().fg(self.theme.recent),
            )
        } else if panel.modified_count == 0 && panel.staged_count == 0 {
            Span::styled("clean", Style::default().fg(self.theme.success))
        } else {
            Span::styled(
                format!("~{} +{}", panel.modified_count, panel.staged_count),
                Style::default().fg(self.theme.warning),
            )
        };
        let activity = if !panel.process_names.is_empty() {
            panel.process_names.join(", ")
        } else if panel.last_activity > 0 {
            format_age(now - panel.last_activity)
        } else {
            String::new()
        };

        let lines = vec![
            Line::from(Span::styled(
                truncate_with_ellipsis(&format!("⎇ {branch}"), inner_width),
                self.theme.muted_style(),
            )),
            Line::from(session_line),
            Line::from(status_line),
            Line::from(Span::styled(
                truncate_with_ellipsis(&activity, inner_width),
                self.theme.muted_style(),
            )),
        ];
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_empty_state(&self, f: &mut Frame, viewport: Viewport) {
        let message = if self.grid.total_panels() == 0 {
            "No worktrees or sessions yet. Press n to create one.".to_string()
        } else {
            format!("Nothing matches `{}`", self.grid.filter_text())
        };
        if let Some(area) = viewport.rect(
            ACTIONS_HEIGHT + 1,
            1,
            viewport.area.x,
            viewport.area.width,
        ) {
            let hint = Paragraph::new(Span::styled(message, self.theme.muted_style()))
                .alignment(Alignment::Center);
            f.render_widget(hint, area);
        }
    }
}

impl Page for GridPage<'_> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let show_filter = self.grid.is_filter_editing() || !self.grid.filter_text().is_empty();
        let (filter_area, body) = if show_filter {
            let chunks = Layout::default()
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(area);

            (Some(chunks[0]), chunks[1])
        } else {
            (None, area)
        };

        self.grid.set_width(body.width);
        let offset = self.grid.update_scroll(usize::from(body.height));
        let viewport = Viewport { area: body, offset };

        if let Some(filter_area) = filter_area {
            self.render_filter_bar(f, filter_area);
        }
        self.render_actions(f, viewport);

        let lens = self.grid.lens();
        if lens.panels() + lens.available == 0 {
            self.render_empty_state(f, viewport);

            return;
        }

        let sections = [
            Section {
                number_base: 0,
                panels: self.grid.visible_sessions(),
                slot_of: |_, index| Slot::Panel(index),
                slot_base: 0,
                title: "Sessions",
            },
            Section {
                number_base: lens.sessions,
                panels: self.grid.visible_recent(),
                slot_of: |base, index| Slot::Panel(base + index),
                slot_base: lens.sessions,
                title: "Recent",
            },
            Section {
                number_base: lens.panels(),
                panels: self.grid.visible_available(),
                slot_of: |_, index| Slot::Available(index),
                slot_base: 0,
                title: "Available",
            },
        ];
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        let mut line = ACTIONS_HEIGHT;
        for section in &sections {
            line += self.render_section(f, viewport, line, section, now);
        }
    }
}
