use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::Preview;
use crate::app::list::{ListItem, WorktreeList};
use crate::domain::worktree::{Snapshot, WorktreeState};
use crate::ui::components::preview_pane::PreviewPane;
use crate::ui::style::Theme;
use crate::ui::{Component, Page};

/// List view: one table row per worktree, orphan, and recent entry, with a
/// preview of the selected row's session on the right.
pub struct WorktreeListPage<'a> {
    list: &'a mut WorktreeList,
    preview: Option<&'a Preview>,
    snapshot: &'a Snapshot,
    theme: Theme,
}

impl<'a> WorktreeListPage<'a> {
    pub fn new(
        list: &'a mut WorktreeList,
        snapshot: &'a Snapshot,
        preview: Option<&'a Preview>,
        theme: Theme,
    ) -> Self {
        Self {
            list,
            preview,
            snapshot,
            theme,
        }
    }

    fn row(&self, item: &ListItem) -> Row<'static> {
        let session_style = Style::default().fg(self.theme.session);
        let cells = match item {
            ListItem::Worktree(state) => {
                let name = if state.is_main() {
                    format!("{} (main)", state.working_tree.name)
                } else {
                    state.working_tree.name.clone()
                };
                let session = if state.has_session {
                    Cell::from(format!("● {}", state.canonical_session_name)).style(session_style)
                } else {
                    Cell::from("-").style(self.theme.muted_style())
                };

                vec![
                    Cell::from(name),
                    Cell::from(state.branch_label().to_string()),
                    session,
                    Cell::from(worktree_status(state)),
                ]
            }
            ListItem::Orphan(orphan) => vec![
                Cell::from(orphan.name().to_string()),
                Cell::from("-").style(self.theme.muted_style()),
                Cell::from(format!("● {}", orphan.name())).style(session_style),
                Cell::from("orphan").style(Style::default().fg(self.theme.orphan)),
            ],
            ListItem::Recent(entry) => {
                let session = if self.snapshot.has_live_session(&entry.session_name) {
                    Cell::from(format!("● {}", entry.session_name)).style(session_style)
                } else {
                    Cell::from("-").style(self.theme.muted_style())
                };

                vec![
                    Cell::from(format!("{}/{}", entry.repo_name, entry.worktree)),
                    Cell::from("-").style(self.theme.muted_style()),
                    session,
                    Cell::from("recent").style(Style::default().fg(self.theme.recent)),
                ]
            }
        };

        Row::new(cells).height(1)
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.muted_style())
            .title(Span::styled(" Worktrees ", self.theme.accent_bold()));

        if self.list.items().is_empty() {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No worktrees found. Press n to create one.",
                    Style::default().fg(self.theme.accent),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(hint, area);

            return;
        }

        let header_cells = ["Name", "Branch", "Session", "Status"]
            .iter()
            .map(|header| Cell::from(*header));
        let header = Row::new(header_cells)
            .style(self.theme.muted_style())
            .height(1)
            .bottom_margin(1);
        let rows: Vec<Row<'static>> = self
            .list
            .items()
            .iter()
            .map(|item| self.row(item))
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(30),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Min(8),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(self.theme.selection_background))
        .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.list.table_state);
    }
}

impl Page for WorktreeListPage<'_> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        self.render_table(f, chunks[0]);

        let session_name = self
            .list
            .selected()
            .and_then(|item| item.live_session_name(self.snapshot));
        PreviewPane::new(session_name.as_deref(), self.preview, self.theme).render(f, chunks[1]);
    }
}

/// Formats local changes and upstream drift as a compact label.
fn worktree_status(state: &WorktreeState) -> String {
    let mut parts = Vec::new();
    match state.status_summary {
        Some(summary) if summary.is_clean() => parts.push("clean".to_string()),
        Some(summary) => {
            if summary.modified > 0 {
                parts.push(format!("~{}", summary.modified));
            }
            if summary.staged > 0 {
                parts.push(format!("+{}", summary.staged));
            }
            if summary.untracked > 0 {
                parts.push(format!("?{}", summary.untracked));
            }
        }
        None => parts.push("?".to_string()),
    }
    if state.ahead_count > 0 {
        parts.push(format!("↑{}", state.ahead_count));
    }
    if state.behind_count > 0 {
        parts.push(format!("↓{}", state.behind_count));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::app::list::build_items;
    use crate::app::test_support::{sample_snapshot, worktree_state};
    use crate::domain::worktree::StatusSummary;

    fn rendered_text(list: &mut WorktreeList, snapshot: &Snapshot) -> String {
        let backend = TestBackend::new(120, 12);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        terminal
            .draw(|f| {
                let area = f.area();
                WorktreeListPage::new(list, snapshot, None, Theme::DEFAULT).render(f, area);
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
    fn test_worktree_list_page_renders_every_row_kind() {
        // Arrange
        let snapshot = sample_snapshot();
        let mut list = WorktreeList::default();
        list.set_items(build_items(&snapshot, &[]));

        // Act
        let text = rendered_text(&mut list, &snapshot);

        // Assert
        assert!(text.contains("app (main)"));
        assert!(text.contains("● app-login"));
        assert!(text.contains("orphan"));
        assert!(text.contains(">> "));
    }

    #[test]
    fn test_worktree_list_page_shows_empty_hint() {
        // Arrange
        let snapshot = Snapshot::default();
        let mut list = WorktreeList::default();

        // Act
        let text = rendered_text(&mut list, &snapshot);

        // Assert
        assert!(text.contains("No worktrees found. Press n to create one."));
        assert!(text.contains("No live session"));
    }

    #[test]
    fn test_worktree_status_combines_changes_and_drift() {
        // Arrange
        let mut state = worktree_state("/src/app-login", true);
        state.status_summary = Some(StatusSummary {
            modified: 2,
            staged: 1,
            untracked: 0,
        });
        state.behind_count = 3;

        // Act
        let status = worktree_status(&state);

        // Assert
        assert_eq!(status, "~2 +1 ↓3");
    }
}
