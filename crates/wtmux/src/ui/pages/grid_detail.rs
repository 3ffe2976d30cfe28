use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::Preview;
use crate::domain::panel::GridPanel;
use crate::domain::worktree::WorktreeState;
use crate::ui::components::preview_pane::PreviewPane;
use crate::ui::style::Theme;
use crate::ui::util::display_path;
use crate::ui::{Component, Page};

const LABEL_WIDTH: usize = 10;

/// Full-screen detail of one grid panel with its session preview.
pub struct GridDetailPage<'a> {
    panel: Option<&'a GridPanel>,
    preview: Option<&'a Preview>,
    theme: Theme,
    worktree: Option<&'a WorktreeState>,
}

impl<'a> GridDetailPage<'a> {
    pub fn new(
        panel: Option<&'a GridPanel>,
        worktree: Option<&'a WorktreeState>,
        preview: Option<&'a Preview>,
        theme: Theme,
    ) -> Self {
        Self {
            panel,
            preview,
            theme,
            worktree,
        }
    }

    fn field(&self, label: &str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{label:<LABEL_WIDTH$}"), self.theme.muted_style()),
            Span::styled(value, Style::default().fg(self.theme.text)),
        ])
    }

    fn info_lines(&self, panel: &GridPanel) -> Vec<Line<'static>> {
        let mut lines = vec![
            self.field("Repo", panel.repo_name.clone()),
            self.field(
                "Branch",
                if panel.branch.is_empty() {
                    "-".to_string()
                } else {
                    panel.branch.clone()
                },
            ),
        ];
        if let Some(path) = panel.checkout_path() {
            lines.push(self.field("Path", display_path(path)));
        }

        let session = if panel.has_session {
            format!(
                "{} ({} windows, {} panes)",
                panel.session_name, panel.window_count, panel.pane_count
            )
        } else {
            "not running".to_string()
        };
        lines.push(self.field("Session", session));
        if panel.is_orphan {
            lines.push(Line::from(Span::styled(
                "No worktree matches this session.",
                Style::default().fg(self.theme.orphan),
            )));
        }

        let Some(worktree) = self.worktree else {
            return lines;
        };

        lines.push(self.field(
            "Upstream",
            format!("↑{} ↓{}", worktree.ahead_count, worktree.behind_count),
        ));
        let changes = match worktree.status_summary {
            Some(summary) if summary.is_clean() => "clean".to_string(),
            Some(summary) => format!(
                "{} modified, {} staged, {} untracked",
                summary.modified, summary.staged, summary.untracked
            ),
            None => "unknown".to_string(),
        };
        lines.push(self.field("Changes", changes));
        if !worktree.process_names.is_empty() {
            lines.push(self.field("Processes", worktree.process_names.join(", ")));
        }
        if !worktree.recent_commits.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Recent commits",
                self.theme.accent_bold(),
            )));
            for commit in &worktree.recent_commits {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{} ", commit.hash),
                        Style::default().fg(self.theme.warning),
                    ),
                    Span::styled(commit.message.clone(), Style::default().fg(self.theme.text)),
                ]));
            }
        }

        lines
    }
}

impl Page for GridDetailPage<'_> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let (title, lines) = match self.panel {
            Some(panel) => (format!(" {} ", panel.display_name), self.info_lines(panel)),
            None => (
                " Detail ".to_string(),
                vec![Line::from(Span::styled(
                    "Nothing selected",
                    self.theme.muted_style(),
                ))],
            ),
        };
        let info = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border(true))
                .title(Span::styled(title, self.theme.accent_bold())),
        );
        f.render_widget(info, chunks[0]);

        let session_name = self
            .panel
            .filter(|panel| panel.has_session)
            .map(|panel| panel.session_name.as_str());
        PreviewPane::new(session_name, self.preview, self.theme).render(f, chunks[1]);
    }
}
