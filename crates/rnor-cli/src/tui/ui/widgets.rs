use ratatui::prelude::*;
use rnor_core::Residency;

use crate::tui::themes::Theme;

/// ` NRI ` on the status color.
pub fn status_badge(status: Residency, theme: &Theme) -> Span<'static> {
    Span::styled(
        format!(" {:^4} ", status.display_label()),
        Style::default()
            .fg(Color::Rgb(26, 30, 41))
            .bg(theme.status_color(status))
            .add_modifier(Modifier::BOLD),
    )
}

pub fn field_border(focused: bool, has_error: bool, theme: &Theme) -> Style {
    if has_error {
        Style::default().fg(theme.error)
    } else if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.border)
    }
}

/// Keeps the tail of `text` visible when it is wider than `width`.
pub fn tail_fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        text.to_string()
    } else {
        text.chars().skip(count - width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_fit() {
        assert_eq!(tail_fit("05/04/2021", 20), "05/04/2021");
        assert_eq!(tail_fit("05/04/2021", 4), "2021");
        assert_eq!(tail_fit("", 0), "");
    }
}
