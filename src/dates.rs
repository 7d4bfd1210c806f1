//! Calendar-date primitives shared by the engine and the command layer.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::error::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years accepted from user input.
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1900..=2199;

/// Parse a `YYYY-MM-DD` date within [`SUPPORTED_YEARS`].
/// Failures are returned to the caller untouched.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|source| {
        Error::InvalidDate {
            input: input.to_string(),
            source,
        }
    })?;
    if !SUPPORTED_YEARS.contains(&date.year()) {
        return Err(Error::DateOutOfRange { date });
    }
    Ok(date)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// `date` shifted by `days`, saturating at the ends of the calendar.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|offset| date.checked_add_signed(offset))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// The local calendar date, used as the default reference day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
