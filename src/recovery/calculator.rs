//! Post-surgery day calculation.
//!
//! Day 0 is the calendar date of surgery. An event's post-surgery day is the
//! number of calendar days between its own calendar date and day 0, so the
//! time of day never matters: 23:59 on surgery day is still day 0, and any
//! moment of the previous day is day -1.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::error::RecoveryError;

/// Anything that falls on a single calendar date.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// Zoned instants fall on the calendar date of their own offset.
impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: CalendarDay + ?Sized> CalendarDay for &T {
    fn calendar_day(&self) -> NaiveDate {
        (**self).calendar_day()
    }
}

/// A parsed event time: either a bare date (day-keyed records) or an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl EventDate {
    /// Midnight for date-only values.
    pub fn to_datetime(self) -> NaiveDateTime {
        match self {
            EventDate::Date(d) => d.and_time(NaiveTime::MIN),
            EventDate::DateTime(dt) => dt,
        }
    }
}

impl CalendarDay for EventDate {
    fn calendar_day(&self) -> NaiveDate {
        match self {
            EventDate::Date(d) => *d,
            EventDate::DateTime(dt) => dt.date(),
        }
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse an event time as written by clients or read back from storage.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS[.fff]]` (space or `T`
/// separated) and RFC 3339. RFC 3339 values keep the wall-clock time of
/// their own offset.
pub fn parse_event_date(input: &str) -> Result<EventDate, RecoveryError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(RecoveryError::InvalidArgument("event date is empty".into()));
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(EventDate::Date(d));
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(EventDate::DateTime(dt));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(EventDate::DateTime(dt.naive_local()));
    }

    Err(RecoveryError::InvalidArgument(format!(
        "unrecognised event date: {input:?}"
    )))
}

/// Parse a surgery date. Time-of-day, if present, is discarded.
pub fn parse_surgery_date(input: &str) -> Result<NaiveDate, RecoveryError> {
    parse_event_date(input).map(|e| e.calendar_day())
}

/// Post-surgery day of `event`, or `None` when there is no surgery date.
pub fn compute<E, S>(event: &E, surgery_date: Option<S>) -> Option<i64>
where
    E: CalendarDay + ?Sized,
    S: CalendarDay,
{
    surgery_date.map(|s| {
        event
            .calendar_day()
            .signed_duration_since(s.calendar_day())
            .num_days()
    })
}

/// Parse-then-compute for string input. An unparsable event date is an
/// error even when the surgery date is unknown.
pub fn compute_from_str(event: &str, surgery_date: Option<NaiveDate>) -> Result<Option<i64>, RecoveryError> {
    let event = parse_event_date(event)?;
    Ok(compute(&event, surgery_date))
}
