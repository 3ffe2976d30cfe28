use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::notification::{Notification, NotificationLevel};
use crate::ui::Component;
use crate::ui::style::Theme;
use crate::ui::util::truncate_with_ellipsis;

const TOAST_HEIGHT: u16 = 3;
const TOAST_MARGIN: u16 = 1;

/// Transient message drawn in the bottom-right corner of the content area.
pub struct NotificationToast<'a> {
    notification: &'a Notification,
    theme: Theme,
}

impl<'a> NotificationToast<'a> {
    pub fn new(notification: &'a Notification, theme: Theme) -> Self {
        Self {
            notification,
            theme,
        }
    }
}

impl Component for NotificationToast<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        if area.height < TOAST_HEIGHT || area.width < 8 {
            return;
        }

        let max_width = area.width.saturating_sub(TOAST_MARGIN * 2);
        let message_width = u16::try_from(self.notification.message.width()).unwrap_or(u16::MAX);
        let width = message_width.saturating_add(4).min(max_width);
        let toast_area = Rect::new(
            area.x + area.width.saturating_sub(width + TOAST_MARGIN),
            area.y + area.height - TOAST_HEIGHT,
            width,
            TOAST_HEIGHT,
        );
        let color = match self.notification.level {
            NotificationLevel::Error => self.theme.error,
            NotificationLevel::Info => self.theme.success,
        };
        let message = truncate_with_ellipsis(
            &self.notification.message,
            usize::from(width.saturating_sub(4)),
        );
        let toast = Paragraph::new(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(self.theme.text),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

        f.render_widget(Clear, toast_area);
        f.render_widget(toast, toast_area);
    }
}
