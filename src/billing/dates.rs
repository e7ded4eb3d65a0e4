//! Date-month utilities
//!
//! Normalizes calendar dates into monthly billing periods and parses the
//! loosely formatted timestamps delivered by the data layer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt;

use crate::error::TuitionError;
use crate::models::MonthKey;

/// The `YYYY-MM` key of the month containing `date`
pub fn month_key_of(date: NaiveDate) -> MonthKey {
    MonthKey::of(date)
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    MonthKey::of(date).first_day()
}

/// Last day of the month containing `date`
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    MonthKey::of(date).last_day()
}

/// First-of-month dates from `start`'s month through `end`'s month inclusive
///
/// Empty when `start > end`. The returned iterator is a plain value, so a
/// clone restarts the sequence from the beginning.
pub fn month_range(start: NaiveDate, end: NaiveDate) -> MonthRange {
    if start > end {
        return MonthRange { next: None, last: MonthKey::of(end) };
    }
    MonthRange {
        next: Some(MonthKey::of(start)),
        last: MonthKey::of(end),
    }
}

/// Ascending iterator over calendar months
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<MonthKey>,
    last: MonthKey,
}

impl MonthRange {
    /// Iterate month keys instead of first-of-month dates
    pub fn keys(self) -> impl Iterator<Item = MonthKey> {
        self.map(MonthKey::of)
    }
}

impl Iterator for MonthRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current < self.last {
            Some(current.next())
        } else {
            None
        };
        Some(current.first_day())
    }
}

/// Error for timestamps that match none of the accepted shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError(pub String);

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unrecognized timestamp: {}", self.0)
    }
}

impl std::error::Error for DateParseError {}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a record timestamp into UTC
///
/// Accepts RFC 3339, naive `YYYY-MM-DD[T ]HH:MM:SS[.fff]` (taken as UTC)
/// and a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DateParseError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(DateParseError(raw.to_string()))
}

/// Parse a record timestamp and keep only its (UTC) calendar date
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    parse_timestamp(raw).map(|dt| dt.date_naive())
}

/// The first of `primary` / `fallback` that parses
///
/// An unparsable `primary` is treated as absent.
pub fn effective_timestamp(primary: Option<&str>, fallback: Option<&str>) -> Option<DateTime<Utc>> {
    primary
        .and_then(|raw| parse_timestamp(raw).ok())
        .or_else(|| fallback.and_then(|raw| parse_timestamp(raw).ok()))
}

/// Build the crate error for a malformed timestamp field
pub fn date_error(entity: impl Into<String>, field: &'static str, value: &str) -> TuitionError {
    TuitionError::DateParse {
        entity: entity.into(),
        field,
        value: value.to_string(),
    }
}
