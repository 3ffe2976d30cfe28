use ratatui::style::{Color, Modifier, Style};

/// Colors used by every page and component.
///
/// Passed by value into render calls; nothing mutates it after startup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Theme {
    pub accent: Color,
    pub bar_background: Color,
    pub error: Color,
    pub muted: Color,
    pub orphan: Color,
    pub recent: Color,
    pub selection_background: Color,
    pub session: Color,
    pub success: Color,
    pub text: Color,
    pub warning: Color,
}

impl Theme {
    pub const DEFAULT: Theme = Theme {
        accent: Color::Cyan,
        bar_background: Color::DarkGray,
        error: Color::Red,
        muted: Color::DarkGray,
        orphan: Color::Magenta,
        recent: Color::LightBlue,
        selection_background: Color::DarkGray,
        session: Color::Green,
        success: Color::Green,
        text: Color::White,
        warning: Color::Yellow,
    };

    pub fn accent_bold(self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Border style of a grid cell or action button.
    pub fn border(self, is_selected: bool) -> Style {
        if is_selected {
            self.accent_bold()
        } else {
            self.muted_style()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DEFAULT
    }
}
