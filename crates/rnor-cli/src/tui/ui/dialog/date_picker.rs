use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use rnor_core::calendar::{month_grid, CalendarNav, DateField, NavAction};
use rnor_core::date::days_in_month;
use rnor_core::CalendarDate;

use crate::tui::app::PickedDate;
use crate::tui::themes::Theme;

use super::{DialogContent, DialogResult};

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerFocus {
    Year,
    Days,
}

pub struct DatePickerDialog {
    field: DateField,
    nav: CalendarNav,
    selected: Option<CalendarDate>,
    today: CalendarDate,
    focus: PickerFocus,
    day: u32,
    picked: PickedDate,
}

impl DatePickerDialog {
    pub fn new(
        field: DateField,
        selected: Option<CalendarDate>,
        today: CalendarDate,
        picked: PickedDate,
    ) -> Self {
        let nav = CalendarNav::for_field(field, selected, today);
        let cursor = nav.cursor;
        let day = match selected {
            Some(date) => date.day(),
            None if today.year() == cursor.year && today.month() == cursor.month0 + 1 => today.day(),
            None => 1,
        };

        Self {
            field,
            nav,
            selected,
            today,
            focus: PickerFocus::Days,
            day,
            picked,
        }
    }

    fn month_len(&self) -> u32 {
        days_in_month(self.nav.cursor.year, self.nav.cursor.month0 + 1)
    }

    fn navigate(&mut self, action: NavAction) {
        self.nav = self.nav.clone().apply(action);
        self.day = self.day.clamp(1, self.month_len());
    }

    fn move_day(&mut self, delta: i32) {
        let target = self.day as i32 + delta;
        self.day = target.clamp(1, self.month_len() as i32) as u32;
    }

    fn edit_year(&mut self, edit: impl FnOnce(&mut String)) {
        let mut text = self.nav.year_text.clone();
        edit(&mut text);
        self.navigate(NavAction::TypeYear(text));
    }

    fn select_day(&mut self) -> DialogResult {
        let cursor = self.nav.cursor;
        let Some(date) = CalendarDate::from_ymd(cursor.year, cursor.month0 + 1, self.day) else {
            return DialogResult::None;
        };
        self.navigate(NavAction::Select(date));
        *self.picked.borrow_mut() = Some((self.field, date));
        DialogResult::Close
    }

    fn render_year_row(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let box_style = if self.focus == PickerFocus::Year {
            Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.accent)
        };
        let line = Line::from(vec![
            Span::styled("▲  ", Style::default().fg(theme.muted)),
            Span::styled(format!(" {:^4} ", self.nav.year_text), box_style),
            Span::styled("  ▼", Style::default().fg(theme.muted)),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn render_month_row(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let line = Line::from(vec![
            Span::styled("◀  ", Style::default().fg(theme.muted)),
            Span::styled(
                format!("{:^11}", self.nav.cursor.month_name()),
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  ▶", Style::default().fg(theme.muted)),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn day_style(&self, day: u32, theme: &Theme) -> Style {
        let cursor = self.nav.cursor;
        let matches = |date: CalendarDate| {
            date.year() == cursor.year && date.month() == cursor.month0 + 1 && date.day() == day
        };

        if self.focus == PickerFocus::Days && day == self.day {
            return Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD);
        }
        if self.selected.is_some_and(matches) {
            return Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        if matches(self.today) {
            return Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD);
        }
        Style::default().fg(theme.muted)
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut lines = Vec::with_capacity(7);
        lines.push(Line::from(
            WEEKDAYS
                .iter()
                .map(|d| Span::styled(format!(" {} ", d), Style::default().fg(theme.muted)))
                .collect::<Vec<_>>(),
        ));

        for week in month_grid(self.nav.cursor) {
            let spans: Vec<Span> = week
                .iter()
                .map(|cell| match cell {
                    Some(day) => Span::styled(format!(" {:>2} ", day), self.day_style(*day, theme)),
                    None => Span::raw("    "),
                })
                .collect();
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }
}

impl DialogContent for DatePickerDialog {
    fn desired_size(&self, viewport: Rect) -> (u16, u16) {
        let width = 34u16.min(viewport.width.saturating_sub(4));
        let height = 15u16.min(viewport.height.saturating_sub(2));
        (width, height)
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(format!(" {} ", self.field.label()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(7),
                Constraint::Length(1),
            ])
            .split(inner);

        self.render_year_row(frame, rows[0], theme);
        self.render_month_row(frame, rows[1], theme);
        self.render_grid(frame, rows[3], theme);

        let hint = match self.focus {
            PickerFocus::Year => "0-9 year • ↑↓ year • Enter days • Esc",
            PickerFocus::Days => "←→ month • ↑↓ year • hjkl day • Enter",
        };
        let hint = Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted));
        frame.render_widget(hint, rows[4]);
    }

    fn handle_key(&mut self, key: KeyCode) -> DialogResult {
        match (self.focus, key) {
            (_, KeyCode::Tab | KeyCode::BackTab) => {
                self.focus = match self.focus {
                    PickerFocus::Year => PickerFocus::Days,
                    PickerFocus::Days => PickerFocus::Year,
                };
            }
            (_, KeyCode::Up) => self.navigate(NavAction::PrevYear),
            (_, KeyCode::Down) => self.navigate(NavAction::NextYear),
            (_, KeyCode::Left) => self.navigate(NavAction::PrevMonth),
            (_, KeyCode::Right) => self.navigate(NavAction::NextMonth),
            (PickerFocus::Year, KeyCode::Char(ch)) if ch.is_ascii_digit() => {
                if self.nav.year_text.len() < 4 {
                    self.edit_year(|text| text.push(ch));
                }
            }
            (PickerFocus::Year, KeyCode::Backspace) => {
                self.edit_year(|text| {
                    text.pop();
                });
            }
            (PickerFocus::Year, KeyCode::Enter) => {
                self.focus = PickerFocus::Days;
                self.day = 1;
            }
            (PickerFocus::Days, KeyCode::Char('h')) => self.move_day(-1),
            (PickerFocus::Days, KeyCode::Char('l')) => self.move_day(1),
            (PickerFocus::Days, KeyCode::Char('k')) => self.move_day(-7),
            (PickerFocus::Days, KeyCode::Char('j')) => self.move_day(7),
            (PickerFocus::Days, KeyCode::Enter | KeyCode::Char(' ')) => return self.select_day(),
            _ => {}
        }
        DialogResult::None
    }
}
