//! Month/year navigation for the date picker.
//!
//! The displayed month is tracked separately from the committed date value,
//! and every transition is a pure function of `(state, action)`.

use chrono::{Datelike, NaiveDate};

use crate::date::{days_in_month, CalendarDate, MAX_YEAR, MIN_YEAR};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Which form field a picker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Departure,
    Return,
}

impl DateField {
    pub fn label(&self) -> &'static str {
        match self {
            DateField::Departure => "Date of Departure",
            DateField::Return => "Date of Return",
        }
    }
}

/// The month currently shown by the picker. `month0` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationCursor {
    pub year: i32,
    pub month0: u32,
}

impl NavigationCursor {
    pub fn of(date: CalendarDate) -> Self {
        Self {
            year: date.year().clamp(MIN_YEAR, MAX_YEAR),
            month0: date.month() - 1,
        }
    }

    fn checked(year: i32, month0: u32) -> Option<Self> {
        ((MIN_YEAR..=MAX_YEAR).contains(&year) && month0 < 12).then_some(Self { year, month0 })
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    PrevMonth,
    NextMonth,
    PrevYear,
    NextYear,
    /// Raw contents of the year box after an edit.
    TypeYear(String),
    Select(CalendarDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarNav {
    pub cursor: NavigationCursor,
    pub year_text: String,
}

impl CalendarNav {
    pub fn new(selected: Option<CalendarDate>, today: CalendarDate) -> Self {
        Self::at(NavigationCursor::of(selected.unwrap_or(today)))
    }

    /// Like [`CalendarNav::new`], but an empty departure field opens on April 2000.
    pub fn for_field(field: DateField, selected: Option<CalendarDate>, today: CalendarDate) -> Self {
        match (field, selected) {
            (DateField::Departure, None) => Self::at(NavigationCursor {
                year: 2000,
                month0: 3,
            }),
            _ => Self::new(selected, today),
        }
    }

    fn at(cursor: NavigationCursor) -> Self {
        Self {
            year_text: cursor.year.to_string(),
            cursor,
        }
    }

    pub fn apply(self, action: NavAction) -> Self {
        let NavigationCursor { year, month0 } = self.cursor;
        let moved = match action {
            NavAction::PrevMonth if month0 == 0 => NavigationCursor::checked(year - 1, 11),
            NavAction::PrevMonth => NavigationCursor::checked(year, month0 - 1),
            NavAction::NextMonth if month0 == 11 => NavigationCursor::checked(year + 1, 0),
            NavAction::NextMonth => NavigationCursor::checked(year, month0 + 1),
            NavAction::PrevYear => NavigationCursor::checked(year - 1, month0),
            NavAction::NextYear => NavigationCursor::checked(year + 1, month0),
            NavAction::Select(date) => Some(NavigationCursor::of(date)),
            NavAction::TypeYear(text) => {
                let committed = parse_typed_year(&text)
                    .and_then(|typed| NavigationCursor::checked(typed, month0));
                return Self {
                    cursor: committed.unwrap_or(self.cursor),
                    year_text: text,
                };
            }
        };

        match moved {
            Some(cursor) => Self::at(cursor),
            None => self,
        }
    }
}

fn parse_typed_year(text: &str) -> Option<i32> {
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

pub fn month_name(month0: u32) -> &'static str {
    MONTH_NAMES[(month0 % 12) as usize]
}

/// Weeks of the cursor's month, Sunday first. Empty cells are `None`.
pub fn month_grid(cursor: NavigationCursor) -> Vec<[Option<u32>; 7]> {
    let month = cursor.month0 + 1;
    let Some(first) = NaiveDate::from_ymd_opt(cursor.year, month, 1) else {
        return Vec::new();
    };
    let lead = first.weekday().num_days_from_sunday() as usize;
    let total = days_in_month(cursor.year, month);

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = lead;
    for day in 1..=total {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::from_ymd(year, month, day).unwrap()
    }

    fn nav(year: i32, month0: u32) -> CalendarNav {
        CalendarNav::at(NavigationCursor { year, month0 })
    }

    #[test]
    fn test_next_month_rolls_into_january() {
        let next = nav(2024, 11).apply(NavAction::NextMonth);
        assert_eq!(next.cursor, NavigationCursor { year: 2025, month0: 0 });
        assert_eq!(next.year_text, "2025");
    }

    #[test]
    fn test_prev_month_rolls_into_december() {
        let prev = nav(2024, 0).apply(NavAction::PrevMonth);
        assert_eq!(prev.cursor, NavigationCursor { year: 2023, month0: 11 });
    }

    #[test]
    fn test_year_navigation_preserves_month() {
        let state = nav(2024, 5).apply(NavAction::NextYear);
        assert_eq!(state.cursor, NavigationCursor { year: 2025, month0: 5 });
        let state = state.apply(NavAction::PrevYear).apply(NavAction::PrevYear);
        assert_eq!(state.cursor, NavigationCursor { year: 2023, month0: 5 });
    }

    #[test]
    fn test_typing_commits_only_at_four_digits() {
        let start = nav(1999, 2);
        let partial = start.clone().apply(NavAction::TypeYear("202".into()));
        assert_eq!(partial.cursor, start.cursor);
        assert_eq!(partial.year_text, "202");

        let full = partial.apply(NavAction::TypeYear("2024".into()));
        assert_eq!(full.cursor, NavigationCursor { year: 2024, month0: 2 });
        assert_eq!(full.year_text, "2024");
    }

    #[test]
    fn test_typing_non_numeric_keeps_cursor() {
        let start = nav(2010, 0);
        let typed = start.clone().apply(NavAction::TypeYear("20a4".into()));
        assert_eq!(typed.cursor, start.cursor);
        assert_eq!(typed.year_text, "20a4");
    }

    #[test]
    fn test_out_of_range_moves_are_rejected() {
        let top = nav(2100, 11);
        assert_eq!(top.clone().apply(NavAction::NextMonth), top);
        assert_eq!(top.clone().apply(NavAction::NextYear), top);

        let bottom = nav(1900, 0);
        assert_eq!(bottom.clone().apply(NavAction::PrevMonth), bottom);
        assert_eq!(bottom.clone().apply(NavAction::PrevYear), bottom);

        let typed = nav(2000, 0).apply(NavAction::TypeYear("2500".into()));
        assert_eq!(typed.cursor.year, 2000);
    }

    #[test]
    fn test_select_resets_cursor() {
        let state = nav(2000, 0).apply(NavAction::Select(date(2022, 9, 14)));
        assert_eq!(state.cursor, NavigationCursor { year: 2022, month0: 8 });
        assert_eq!(state.year_text, "2022");
    }

    #[test]
    fn test_initial_cursor() {
        let today = date(2026, 10, 18);
        assert_eq!(
            CalendarNav::new(None, today).cursor,
            NavigationCursor { year: 2026, month0: 9 }
        );
        assert_eq!(
            CalendarNav::new(Some(date(2021, 4, 1)), today).cursor,
            NavigationCursor { year: 2021, month0: 3 }
        );
    }

    #[test]
    fn test_departure_defaults_to_april_2000() {
        let today = date(2026, 10, 18);
        let departure = CalendarNav::for_field(DateField::Departure, None, today);
        assert_eq!(departure.cursor, NavigationCursor { year: 2000, month0: 3 });

        let ret = CalendarNav::for_field(DateField::Return, None, today);
        assert_eq!(ret.cursor, NavigationCursor { year: 2026, month0: 9 });

        let picked = CalendarNav::for_field(DateField::Departure, Some(date(2019, 1, 5)), today);
        assert_eq!(picked.cursor, NavigationCursor { year: 2019, month0: 0 });
    }

    #[test]
    fn test_month_grid_layout() {
        // 1 September 2024 was a Sunday.
        let grid = month_grid(NavigationCursor { year: 2024, month0: 8 });
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0], Some(1));
        assert_eq!(grid[4][1], Some(30));
        assert_eq!(grid[4][2], None);

        // February 2024 starts on Thursday and has 29 days.
        let grid = month_grid(NavigationCursor { year: 2024, month0: 1 });
        assert_eq!(grid[0][3], None);
        assert_eq!(grid[0][4], Some(1));
        let days: Vec<u32> = grid.iter().flatten().flatten().copied().collect();
        assert_eq!(days.len(), 29);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(0), "January");
        assert_eq!(NavigationCursor { year: 2024, month0: 11 }.month_name(), "December");
    }
}
