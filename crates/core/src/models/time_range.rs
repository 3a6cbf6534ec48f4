use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::errors::{BookingError, BookingResult};
use crate::models::wire::parse_time;

/// A half-open `[start, end)` interval on a single calendar day, at minute
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Builds a range, truncating both ends to the minute.
    ///
    /// Fails with [`BookingError::InvalidRange`] unless `start < end`.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> BookingResult<Self> {
        let start = truncate_to_minute(start);
        let end = truncate_to_minute(end);

        if start >= end {
            return Err(BookingError::InvalidRange(format!(
                "start {} must be before end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }

        Ok(Self { date, start, end })
    }

    /// Builds a range from form text: `YYYY-MM-DD` and `HH:MM` fields.
    pub fn parse(date: &str, start: &str, end: &str) -> BookingResult<Self> {
        let (date, start, end) = (date.trim(), start.trim(), end.trim());
        if date.is_empty() || start.is_empty() || end.is_empty() {
            return Err(BookingError::Validation("Please fill in all fields".to_string()));
        }

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| BookingError::Validation(format!("invalid date: {date}")))?;
        let start = parse_time(start)
            .ok_or_else(|| BookingError::Validation(format!("invalid start time: {start}")))?;
        let end = parse_time(end)
            .ok_or_else(|| BookingError::Validation(format!("invalid end time: {end}")))?;

        Self::new(date, start, end)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Touching ranges (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.overlaps_span(other.date, other.start, other.end)
    }

    /// Overlap test against raw fields of a stored booking or blocked slot.
    pub(crate) fn overlaps_span(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.date == date && self.start < end && start < self.end
    }

    /// True when the range lies inside `[open, close]`. A `close` of `00:00`
    /// means the turf stays open until the end of the day.
    pub fn within(&self, open: NaiveTime, close: NaiveTime) -> bool {
        open <= self.start && (close == NaiveTime::MIN || self.end <= close)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes() as f64 / 60.0
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.date.format("%Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}
