//! Month grid layout: which day sits in which slot of a 7-column month view,
//! and which features land on it.
//!
//! All arithmetic is closed-form proleptic Gregorian on plain integers, so any
//! `i32` year lays out, including ones `chrono::NaiveDate` cannot represent.

use chrono::{Datelike, NaiveDate};

use super::cursor::{check_month, CalendarCursor};
use super::error::{CalendarError, CalendarResult};
use super::event::CalendarEvent;

pub const DAYS_PER_WEEK: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    PreviousMonth,
    CurrentMonth,
    NextMonth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// 1-based day of `month`.
    pub day: u32,
    pub membership: Membership,
    /// Wider than a cursor year so the neighbours of `i32::MIN` and
    /// `i32::MAX` still have one.
    pub year: i64,
    /// 0-based month the day belongs to.
    pub month: u32,
    /// Every event ending on this day. Empty for out-of-bounds cells.
    pub events: Vec<CalendarEvent>,
}

impl GridCell {
    pub fn is_current_month(&self) -> bool {
        self.membership == Membership::CurrentMonth
    }

    /// `None` when the year is outside what `NaiveDate` can hold.
    pub fn date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(self.year).ok()?;
        NaiveDate::from_ymd_opt(year, self.month + 1, self.day)
    }

    fn is_on(&self, date: NaiveDate) -> bool {
        self.year == i64::from(date.year())
            && self.month == date.month0()
            && self.day == date.day()
    }
}

pub fn is_leap_year(year: i32) -> bool {
    is_leap(i64::from(year))
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Length of `month` (0-based) in `year`.
pub fn days_in_month(year: i32, month: u32) -> CalendarResult<u32> {
    check_month(month)?;
    Ok(month_length(i64::from(year), month))
}

fn month_length(year: i64, month: u32) -> u32 {
    match month {
        1 if is_leap(year) => 29,
        1 => 28,
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01. `month` is 1-based here.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (i64::from(month) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Weekday of the given date, 0 = Sunday. `month` is 0-based.
pub fn weekday(year: i32, month: u32, day: u32) -> CalendarResult<u32> {
    check_month(month)?;
    if day == 0 || day > month_length(i64::from(year), month) {
        return Err(CalendarError::invalid(format!(
            "day {day} does not exist in {year}-{:02}",
            month + 1
        )));
    }
    // 1970-01-01 was a Thursday.
    let days = days_from_civil(i64::from(year), month + 1, day);
    Ok((days + 4).rem_euclid(7) as u32)
}

fn check_week_start(week_start: u32) -> CalendarResult<()> {
    if week_start >= DAYS_PER_WEEK {
        return Err(CalendarError::invalid(format!(
            "week start must be within 0..=6, got {week_start}"
        )));
    }
    Ok(())
}

/// Number of previous-month cells before day 1.
pub fn leading_blanks(year: i32, month: u32, week_start: u32) -> CalendarResult<u32> {
    check_week_start(week_start)?;
    let first = weekday(year, month, 1)?;
    Ok((first + DAYS_PER_WEEK - week_start) % DAYS_PER_WEEK)
}

/// Lays out `month` (0-based) of `year` with `week_start` (0 = Sunday) in the
/// first column. Cells are returned row by row; the length is always a
/// multiple of seven.
pub fn month_grid(
    year: i32,
    month: u32,
    week_start: u32,
    events: &[CalendarEvent],
) -> CalendarResult<Vec<GridCell>> {
    let leading = leading_blanks(year, month, week_start)?;
    let wide_year = i64::from(year);
    let len = month_length(wide_year, month);

    let (prev_year, prev_month) = match month {
        0 => (wide_year - 1, 11),
        m => (wide_year, m - 1),
    };
    let (next_year, next_month) = match month {
        11 => (wide_year + 1, 0),
        m => (wide_year, m + 1),
    };
    let prev_len = month_length(prev_year, prev_month);

    let trailing = match DAYS_PER_WEEK - (leading + len) % DAYS_PER_WEEK {
        DAYS_PER_WEEK => 0,
        n => n,
    };

    let mut cells = Vec::with_capacity((leading + len + trailing) as usize);

    cells.extend((0..leading).map(|i| GridCell {
        day: prev_len - leading + 1 + i,
        membership: Membership::PreviousMonth,
        year: prev_year,
        month: prev_month,
        events: Vec::new(),
    }));

    cells.extend((1..=len).map(|day| GridCell {
        day,
        membership: Membership::CurrentMonth,
        year: wide_year,
        month,
        events: events
            .iter()
            .filter(|ev| ev.ends_on(year, month, day))
            .cloned()
            .collect(),
    }));

    cells.extend((1..=trailing).map(|day| GridCell {
        day,
        membership: Membership::NextMonth,
        year: next_year,
        month: next_month,
        events: Vec::new(),
    }));

    Ok(cells)
}

pub fn month_grid_for(
    cursor: CalendarCursor,
    week_start: u32,
    events: &[CalendarEvent],
) -> CalendarResult<Vec<GridCell>> {
    month_grid(cursor.year(), cursor.month(), week_start, events)
}

pub fn is_today(cell: &GridCell, reference: NaiveDate) -> bool {
    cell.is_on(reference)
}

pub fn is_selected(cell: &GridCell, selected: Option<NaiveDate>) -> bool {
    selected.is_some_and(|date| cell.is_on(date))
}

/// Parses a `YYYY-MM-DD` reference date.
pub fn parse_reference_date(s: &str) -> CalendarResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| CalendarError::invalid(format!("malformed reference date {s:?}: {e}")))
}
