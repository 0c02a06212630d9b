use chrono::{Datelike, NaiveDate};

use super::error::{CalendarError, CalendarResult};

/// The (year, month) shown by the month view. `month` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarCursor {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Previous,
    Next,
    PreviousYear,
    NextYear,
    JumpTo { year: i32, month: u32 },
}

impl CalendarCursor {
    pub fn new(year: i32, month: u32) -> CalendarResult<Self> {
        check_month(month)?;
        Ok(Self { year, month })
    }

    /// Cursor on the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Fails only when the year would leave the `i32` range.
    pub fn previous(self) -> CalendarResult<Self> {
        if self.month == 0 {
            Ok(Self {
                year: shift_year(self.year, -1)?,
                month: 11,
            })
        } else {
            Ok(Self {
                year: self.year,
                month: self.month - 1,
            })
        }
    }

    pub fn next(self) -> CalendarResult<Self> {
        if self.month == 11 {
            Ok(Self {
                year: shift_year(self.year, 1)?,
                month: 0,
            })
        } else {
            Ok(Self {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    pub fn jump_to(self, year: i32, month: u32) -> CalendarResult<Self> {
        Self::new(year, month)
    }

    pub fn apply(self, nav: Navigation) -> CalendarResult<Self> {
        match nav {
            Navigation::Previous => self.previous(),
            Navigation::Next => self.next(),
            Navigation::PreviousYear => Ok(Self {
                year: shift_year(self.year, -1)?,
                ..self
            }),
            Navigation::NextYear => Ok(Self {
                year: shift_year(self.year, 1)?,
                ..self
            }),
            Navigation::JumpTo { year, month } => self.jump_to(year, month),
        }
    }
}

fn shift_year(year: i32, by: i32) -> CalendarResult<i32> {
    year.checked_add(by)
        .ok_or_else(|| CalendarError::invalid(format!("year {year} has no neighbour at {by:+}")))
}

/// Parses a `YYYY-MM` (1-based month) or bare `YYYY` jump target. A bare
/// year keeps the month of `current`.
pub fn parse_jump(input: &str, current: CalendarCursor) -> CalendarResult<Navigation> {
    let input = input.trim();
    let bad = || CalendarError::invalid(format!("expected YYYY-MM or YYYY, got {input:?}"));

    let (year, month) = match input.rsplit_once('-') {
        Some((year, month)) if !year.is_empty() => {
            let month: u32 = month.parse().map_err(|_| bad())?;
            if !(1..=12).contains(&month) {
                return Err(CalendarError::invalid(format!(
                    "month must be within 1..=12, got {month}"
                )));
            }
            (year, month - 1)
        }
        _ => (input, current.month),
    };
    let year: i32 = year.parse().map_err(|_| bad())?;
    Ok(Navigation::JumpTo { year, month })
}

/// Applies `nav` and reports the new cursor to `on_navigate` when it moved.
pub fn navigate<F>(
    cursor: CalendarCursor,
    nav: Navigation,
    mut on_navigate: F,
) -> CalendarResult<CalendarCursor>
where
    F: FnMut(CalendarCursor),
{
    let next = cursor.apply(nav)?;
    if next != cursor {
        on_navigate(next);
    }
    Ok(next)
}

pub(crate) fn check_month(month: u32) -> CalendarResult<()> {
    if month > 11 {
        return Err(CalendarError::invalid(format!(
            "month must be within 0..=11, got {month}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(year: i32, month: u32) -> CalendarCursor {
        CalendarCursor::new(year, month).unwrap()
    }

    #[test]
    fn next_rolls_over_december() {
        assert_eq!(cursor(2024, 11).next().unwrap(), cursor(2025, 0));
        assert_eq!(cursor(2024, 4).next().unwrap(), cursor(2024, 5));
    }

    #[test]
    fn previous_rolls_back_january() {
        assert_eq!(cursor(2024, 0).previous().unwrap(), cursor(2023, 11));
        assert_eq!(cursor(2024, 4).previous().unwrap(), cursor(2024, 3));
    }

    #[test]
    fn year_is_unbounded() {
        assert_eq!(cursor(i32::MIN + 1, 0).previous().unwrap().year(), i32::MIN);
        assert_eq!(cursor(-44, 2).next().unwrap(), cursor(-44, 3));
        assert_eq!(cursor(i32::MAX, 10).next().unwrap(), cursor(i32::MAX, 11));
    }

    #[test]
    fn stepping_off_the_year_range_is_an_error() {
        assert!(matches!(
            cursor(i32::MAX, 11).next(),
            Err(CalendarError::InvalidArgument(_))
        ));
        assert!(cursor(i32::MIN, 0).previous().is_err());
        assert!(cursor(i32::MAX, 3).apply(Navigation::NextYear).is_err());
        assert!(cursor(i32::MIN, 3).apply(Navigation::PreviousYear).is_err());

        let mut called = false;
        let res = navigate(cursor(i32::MAX, 11), Navigation::Next, |_| called = true);
        assert!(res.is_err());
        assert!(!called);
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(matches!(
            CalendarCursor::new(2024, 12),
            Err(CalendarError::InvalidArgument(_))
        ));
        assert!(cursor(2024, 3).jump_to(2024, 99).is_err());
    }

    #[test]
    fn containing_uses_zero_based_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(CalendarCursor::containing(date), cursor(2024, 2));
    }

    #[test]
    fn navigate_reports_only_real_moves() {
        let mut seen = Vec::new();
        let start = cursor(2024, 5);

        let moved = navigate(start, Navigation::Next, |c| seen.push(c)).unwrap();
        assert_eq!(moved, cursor(2024, 6));

        let same = navigate(moved, Navigation::JumpTo { year: 2024, month: 6 }, |c| seen.push(c)).unwrap();
        assert_eq!(same, moved);

        let back = navigate(same, Navigation::PreviousYear, |c| seen.push(c)).unwrap();
        assert_eq!(back, cursor(2023, 6));

        assert_eq!(seen, vec![cursor(2024, 6), cursor(2023, 6)]);
    }

    #[test]
    fn navigate_rejects_bad_jump_without_callback() {
        let mut called = false;
        let res = navigate(cursor(2024, 0), Navigation::JumpTo { year: 2024, month: 12 }, |_| {
            called = true
        });
        assert!(res.is_err());
        assert!(!called);
    }

    #[test]
    fn jump_targets() {
        let here = cursor(2024, 4);
        assert_eq!(
            parse_jump("2026-03", here).unwrap(),
            Navigation::JumpTo { year: 2026, month: 2 }
        );
        assert_eq!(
            parse_jump(" 1999 ", here).unwrap(),
            Navigation::JumpTo { year: 1999, month: 4 }
        );
        assert_eq!(
            parse_jump("-44-03", here).unwrap(),
            Navigation::JumpTo { year: -44, month: 2 }
        );
        assert_eq!(
            parse_jump("-44", here).unwrap(),
            Navigation::JumpTo { year: -44, month: 4 }
        );
        assert!(matches!(
            parse_jump("2024-13", here),
            Err(CalendarError::InvalidArgument(_))
        ));
        assert!(parse_jump("2024-00", here).is_err());
        assert!(parse_jump("march", here).is_err());
        assert!(parse_jump("", here).is_err());
    }
}
