//! Free-text date entry.
//!
//! Accepted layouts are `D/M/YYYY`, `D-M-YYYY`, `YYYY/M/D` and `YYYY-M-D`,
//! with one- or two-digit day and month and a four-digit year.

use crate::date::{days_in_month, CalendarDate, MAX_YEAR, MIN_YEAR};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid format. Use DD/MM/YYYY or pick a date from the calendar")]
    InvalidFormat,
    #[error("Invalid date: {day}/{month}/{year} does not exist")]
    InvalidDate { day: u32, month: u32, year: i32 },
}

/// `Ok(None)` means the field is empty: no date and nothing to report.
pub type ParsedInput = Result<Option<CalendarDate>, ParseError>;

pub fn parse(text: &str) -> ParsedInput {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let (day, month, year) = split_layout(text).ok_or(ParseError::InvalidFormat)?;
    let invalid = ParseError::InvalidDate { day, month, year };

    if !is_valid_triple(day, month, year) {
        return Err(invalid);
    }

    // chrono must hand back exactly the triple we asked for.
    match CalendarDate::from_ymd(year, month, day) {
        Some(date) if date.year() == year && date.month() == month && date.day() == day => {
            Ok(Some(date))
        }
        _ => Err(invalid),
    }
}

fn is_valid_triple(day: u32, month: u32, year: i32) -> bool {
    (1..=12).contains(&month)
        && (1..=31).contains(&day)
        && (MIN_YEAR..=MAX_YEAR).contains(&year)
        && day <= days_in_month(year, month)
}

/// Returns `(day, month, year)` when `text` matches one of the four layouts.
fn split_layout(text: &str) -> Option<(u32, u32, i32)> {
    let separator = if text.contains('/') {
        '/'
    } else if text.contains('-') {
        '-'
    } else {
        return None;
    };

    let parts: Vec<&str> = text.split(separator).collect();
    let &[first, second, third] = parts.as_slice() else {
        return None;
    };
    if !parts.iter().all(|p| is_digits(p)) {
        return None;
    }

    let short = |s: &str| (1..=2).contains(&s.len());

    if first.len() == 4 && short(second) && short(third) {
        Some((third.parse().ok()?, second.parse().ok()?, first.parse().ok()?))
    } else if short(first) && short(second) && third.len() == 4 {
        Some((first.parse().ok()?, second.parse().ok()?, third.parse().ok()?))
    } else {
        None
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
