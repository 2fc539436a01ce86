use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::spinner::scanner_spans;
use super::widgets::{field_border, tail_fit};
use crate::tui::app::{App, Focus};

/// Rows needed to show every field without squeezing.
pub const HEIGHT: u16 = 2 + 5 * 3 + 3 + 2;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .style(Style::default().bg(app.theme.background));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    for (focus, row) in Focus::all().iter().zip(rows.iter()) {
        match focus {
            Focus::Calculate => render_button(frame, app, *row),
            _ => render_field(frame, app, *focus, *row),
        }
    }

    if let Some(ref error) = app.form.error {
        let banner = Paragraph::new(error.as_str())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(app.theme.error));
        frame.render_widget(banner, rows[6]);
    }
}

fn render_field(frame: &mut Frame, app: &App, focus: Focus, area: Rect) {
    let focused = app.focus == focus;
    let (text, placeholder, error) = match focus.date_field() {
        Some(field) => {
            let input = app.form.date_input(field);
            (
                input.display_text(),
                "DD/MM/YYYY • Enter opens calendar",
                input.error.as_ref().map(|e| e.to_string()),
            )
        }
        None => {
            let value = match focus {
                Focus::AvgDays => &app.form.avg_days,
                Focus::PassiveIncome => &app.form.passive_income,
                _ => &app.form.ctc,
            };
            let hint = if focus == Focus::AvgDays { "required" } else { "optional" };
            (value.clone(), hint, None)
        }
    };

    let mut block = Block::default()
        .title(format!(" {} ", focus.label()))
        .borders(Borders::ALL)
        .border_style(field_border(focused, error.is_some(), &app.theme));
    if let Some(ref message) = error {
        block = block.title_bottom(Line::styled(
            format!(" {} ", message),
            Style::default().fg(app.theme.error),
        ));
    }

    let width = area.width.saturating_sub(3) as usize;
    let line = if text.is_empty() && !focused {
        Line::styled(placeholder, Style::default().fg(app.theme.muted))
    } else {
        let mut spans = vec![Span::styled(
            tail_fit(&text, width),
            Style::default().fg(app.theme.foreground),
        )];
        if focused {
            spans.push(Span::styled("▏", Style::default().fg(app.theme.accent)));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_button(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Calculate;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(field_border(focused, false, &app.theme));

    let line = if app.form.calculating {
        let mut spans = scanner_spans(app.spinner_frame, app.theme.accent, app.theme.border);
        spans.push(Span::styled(
            "  Calculating...",
            Style::default().fg(app.theme.muted),
        ));
        Line::from(spans)
    } else {
        let style = if focused {
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD)
        };
        Line::styled("  Calculate  ", style)
    };

    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center).block(block),
        area,
    );
}
