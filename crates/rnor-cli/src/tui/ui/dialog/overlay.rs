use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Clear},
    Frame,
};

use crate::tui::themes::Theme;

/// Centered rectangle inside `viewport`, leaving a one-cell margin.
pub fn centered_rect(viewport: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(viewport.width.saturating_sub(2));
    let height = height.min(viewport.height.saturating_sub(2));
    let x = viewport.x + viewport.width.saturating_sub(width) / 2;
    let y = viewport.y + viewport.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Dims the form behind an open dialog.
pub fn render_backdrop(frame: &mut Frame, viewport: Rect) {
    frame.render_widget(Clear, viewport);
    let backdrop = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(backdrop, viewport);
}

pub fn render_dialog_surface(frame: &mut Frame, area: Rect, theme: &Theme) {
    frame.render_widget(Clear, area);
    let panel = Block::default().style(Style::default().bg(theme.background).fg(theme.foreground));
    frame.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_viewport() {
        let viewport = Rect::new(0, 0, 100, 40);
        let area = centered_rect(viewport, 34, 16);
        assert_eq!(area, Rect::new(33, 12, 34, 16));

        let small = Rect::new(0, 0, 20, 10);
        let clamped = centered_rect(small, 34, 16);
        assert_eq!(clamped.width, 18);
        assert_eq!(clamped.height, 8);
    }
}
