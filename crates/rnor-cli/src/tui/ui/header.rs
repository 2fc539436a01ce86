use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .style(Style::default().bg(app.theme.background));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(mode_width(app))])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(
            "RNOR Status Calculator",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if app.is_narrow() { "" } else { "  residency by financial year" },
            Style::default().fg(app.theme.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let mode = Paragraph::new(Line::from(mode_label(app)))
        .alignment(Alignment::Right)
        .style(Style::default().fg(app.theme.muted));
    frame.render_widget(mode, chunks[1]);
}

fn mode_label(app: &App) -> String {
    if app.local {
        "local estimate".to_string()
    } else {
        app.api_url().to_string()
    }
}

fn mode_width(app: &App) -> u16 {
    let len = mode_label(app).chars().count() as u16;
    len.min(app.terminal_width / 2)
}
