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

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let help = if app.is_narrow() {
        "Tab:field  Enter:pick/calc  c:calc  q:quit"
    } else {
        "Tab/↑↓:field  Enter/F2:calendar  c:calculate  r:reset  l:local/remote  p:theme  q:quit"
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(app.theme.muted)),
        rows[0],
    );

    if rows.len() > 1 {
        let status = app
            .status_message
            .as_deref()
            .map(|m| Span::styled(m.to_string(), Style::default().fg(app.theme.accent)))
            .unwrap_or_else(|| {
                Span::styled(
                    format!("theme: {}", app.theme.name.as_str()),
                    Style::default().fg(app.theme.border),
                )
            });
        frame.render_widget(Paragraph::new(Line::from(status)), rows[1]);
    }
}
