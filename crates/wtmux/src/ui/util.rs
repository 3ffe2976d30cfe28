use std::path::Path;

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Computes a rectangle centered in `area` covering the given percentages,
/// never smaller than the minimums and never larger than `area`.
pub fn centered_rect(
    area: Rect,
    (width_percent, height_percent): (u16, u16),
    (min_width, min_height): (u16, u16),
) -> Rect {
    let popup_width = (area.width * width_percent / 100).max(min_width);
    let popup_height = (area.height * height_percent / 100).max(min_height);

    let width = popup_width.min(area.width);
    let height = popup_height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width, height)
}

/// Truncates `text` to `max_width` display cells, ending with `…` when cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut truncated = String::new();
    let mut width = 0;
    for character in text.chars() {
        let character_width = character.width().unwrap_or(0);
        if width + character_width + 1 > max_width {
            break;
        }
        truncated.push(character);
        width += character_width;
    }
    truncated.push(ELLIPSIS);

    truncated
}

/// Formats an age in seconds as a short relative label.
pub fn format_age(seconds: i64) -> String {
    match seconds {
        i64::MIN..60 => "just now".to_string(),
        60..3_600 => format!("{}m ago", seconds / 60),
        3_600..86_400 => format!("{}h ago", seconds / 3_600),
        _ => format!("{}d ago", seconds / 86_400),
    }
}

/// Abbreviates the home directory prefix of `path` to `~`.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(relative) = path.strip_prefix(home)
    {
        return format!("~/{}", relative.display());
    }

    path.display().to_string()
}

/// Returns the last `count` non-trailing-blank lines of `content`.
pub fn tail_lines(content: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.trim_end().lines().collect();
    let start = lines.len().saturating_sub(count);

    lines[start..].to_vec()
}
