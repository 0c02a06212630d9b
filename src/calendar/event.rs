use chrono::{Datelike, NaiveDateTime};

use super::error::{CalendarError, CalendarResult};

/// Category shown alongside a feature, e.g. a routine type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub id: String,
    pub name: String,
    /// Hex colour such as `#f59e0b`.
    pub color: String,
}

/// Something placed on the calendar: a routine completion, a product expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub name: String,
    start_at: NaiveDateTime,
    end_at: NaiveDateTime,
    pub status: Status,
}

impl CalendarEvent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_at: NaiveDateTime,
        end_at: NaiveDateTime,
        status: Status,
    ) -> CalendarResult<Self> {
        let id = id.into();
        if start_at > end_at {
            return Err(CalendarError::invalid(format!(
                "event {id} ends ({end_at}) before it starts ({start_at})"
            )));
        }
        Ok(Self {
            id,
            name: name.into(),
            start_at,
            end_at,
            status,
        })
    }

    /// An event occupying a single instant.
    pub fn at(
        id: impl Into<String>,
        name: impl Into<String>,
        instant: NaiveDateTime,
        status: Status,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_at: instant,
            end_at: instant,
            status,
        }
    }

    pub fn start_at(&self) -> NaiveDateTime {
        self.start_at
    }

    pub fn end_at(&self) -> NaiveDateTime {
        self.end_at
    }

    /// True when the event ends on the given day. `month` is 0-based.
    pub fn ends_on(&self, year: i32, month: u32, day: u32) -> bool {
        let end = self.end_at.date();
        end.year() == year && end.month0() == month && end.day() == day
    }

    pub fn duration_display(&self) -> String {
        if self.start_at.date() == self.end_at.date() {
            if self.start_at == self.end_at {
                self.end_at.format("%H:%M").to_string()
            } else {
                format!(
                    "{} - {}",
                    self.start_at.format("%H:%M"),
                    self.end_at.format("%H:%M")
                )
            }
        } else {
            format!("since {}", self.start_at.format("%b %d"))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn status() -> Status {
        Status {
            id: "morning".into(),
            name: "Morning".into(),
            color: "#f59e0b".into(),
        }
    }

    #[test]
    fn rejects_reversed_range() {
        let err = CalendarEvent::new("e1", "Serum", at(2024, 3, 2, 0), at(2024, 3, 1, 0), status())
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidArgument(_)));
    }

    #[test]
    fn ends_on_ignores_time_of_day() {
        let ev = CalendarEvent::new("e1", "Serum", at(2024, 3, 14, 8), at(2024, 3, 15, 23), status())
            .unwrap();
        assert!(ev.ends_on(2024, 2, 15));
        assert!(!ev.ends_on(2024, 2, 14));
        assert!(!ev.ends_on(2024, 3, 15));
    }

    #[test]
    fn duration_display_variants() {
        let point = CalendarEvent::new("a", "A", at(2024, 1, 1, 9), at(2024, 1, 1, 9), status()).unwrap();
        assert_eq!(point.duration_display(), "09:00");
        let span = CalendarEvent::new("b", "B", at(2024, 1, 1, 9), at(2024, 1, 1, 10), status()).unwrap();
        assert_eq!(span.duration_display(), "09:00 - 10:00");
        let multi = CalendarEvent::new("c", "C", at(2024, 1, 1, 9), at(2024, 1, 3, 10), status()).unwrap();
        assert_eq!(multi.duration_display(), "since Jan 01");
    }
}
