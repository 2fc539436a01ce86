pub mod dialog;
mod footer;
mod form;
mod header;
mod results;
pub mod spinner;
mod widgets;

use ratatui::prelude::*;

use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    app.handle_resize(area.width, area.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area);

    header::render(frame, app, chunks[0]);

    let body = if app.is_narrow() {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(form::HEIGHT), Constraint::Min(0)])
            .split(chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1])
    };

    form::render(frame, app, body[0]);
    results::render(frame, app, body[1]);
    footer::render(frame, app, chunks[2]);

    app.dialogs.render(frame, area);
}
