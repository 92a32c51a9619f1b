//! # Time Utilities
//!
//! Month and date-range helpers using chrono. The backend keys monthly data by
//! the first day of the month, formatted `yyyy-MM-dd`.

use chrono::{Datelike, Duration, Local, NaiveDate};

/// Date format used on the wire for days and months.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month preceding the one containing `date`.
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    month_start(first - Duration::days(1))
}

/// Format a day as `yyyy-MM-dd`.
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Format the month containing `date` as its first day, `yyyy-MM-01`.
pub fn format_month_key(date: NaiveDate) -> String {
    format_day(month_start(date))
}

/// Parse a `yyyy-MM-dd` day.
pub fn parse_day(value: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT)
        .map_err(|_| Error::FailToDateParse(value.to_string()))
}

/// Inclusive date range, as sent to the analytics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn start_param(&self) -> String {
        format_day(self.start)
    }

    pub fn end_param(&self) -> String {
        format_day(self.end)
    }
}

/// The `days`-long window ending on `end`.
pub fn date_range_ending(end: NaiveDate, days: i64) -> DateRange {
    DateRange {
        start: end - Duration::days(days),
        end,
    }
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    FailToDateParse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
