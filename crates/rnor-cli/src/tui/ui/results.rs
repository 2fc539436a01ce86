use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::widgets::status_badge;
use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" RNOR Status Results ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .style(Style::default().bg(app.theme.background));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.form.has_results() {
        let placeholder = Paragraph::new(vec![
            Line::raw(""),
            Line::styled(
                "Enter your dates and press Calculate.",
                Style::default().fg(app.theme.muted),
            ),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(placeholder, inner);
        return;
    }

    let summary = app.form.summary();
    let mut lines: Vec<Line> = Vec::new();

    for entry in &app.form.results {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<12}", entry.financial_year),
                Style::default().fg(app.theme.foreground),
            ),
            Span::styled("→ ", Style::default().fg(app.theme.muted)),
            status_badge(entry.status, &app.theme),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!("  {}", summary.message),
        Style::default()
            .fg(app.theme.foreground)
            .add_modifier(Modifier::BOLD),
    ));
    lines.push(Line::raw(""));
    for description in summary.legend {
        lines.push(Line::styled(
            format!("  {}", description),
            Style::default().fg(app.theme.muted),
        ));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
