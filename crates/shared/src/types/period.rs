//! Accounting periods and posting dates.
//!
//! A period is the accounting month a voucher is attributed to, always stored
//! as exactly seven characters `YYYY-MM`. Posting dates arrive either as a
//! calendar date or a full timestamp and are normalized to a UTC timestamp.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar date format used for posting dates and report bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors produced while parsing periods and dates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Period is not `YYYY-MM`.
    #[error("period must be in format YYYY-MM (e.g. '2025-01'), got '{0}'")]
    InvalidPeriod(String),

    /// Date is neither `YYYY-MM-DD` nor an RFC 3339 timestamp.
    #[error("invalid date '{0}', expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    /// Date is not strictly `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidCalendarDate(String),
}

/// Accounting month in `YYYY-MM` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(String);

impl Period {
    /// Parses and validates a period string.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidPeriod` unless the input is exactly
    /// `YYYY-MM` with a month in 01..=12.
    pub fn parse(raw: &str) -> Result<Self, PeriodError> {
        let invalid = || PeriodError::InvalidPeriod(raw.to_string());
        let bytes = raw.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let digits_ok = bytes[..4]
            .iter()
            .chain(&bytes[5..])
            .all(u8::is_ascii_digit);
        if !digits_ok {
            return Err(invalid());
        }
        let month: u32 = raw[5..].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the period containing the given timestamp.
    #[must_use]
    pub fn of(date: DateTime<Utc>) -> Self {
        Self(date.format("%Y-%m").to_string())
    }

    /// Returns the period as `YYYY-MM`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.0
    }
}

/// Normalizes a posting date to a UTC timestamp.
///
/// Accepts `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
///
/// # Errors
///
/// Returns `PeriodError::InvalidDate` for anything else.
pub fn parse_posting_date(raw: &str) -> Result<DateTime<Utc>, PeriodError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| PeriodError::InvalidDate(raw.to_string()))
}

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `PeriodError::InvalidCalendarDate` if the input is not `YYYY-MM-DD`.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, PeriodError> {
    if raw.len() != 10 {
        return Err(PeriodError::InvalidCalendarDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| PeriodError::InvalidCalendarDate(raw.to_string()))
}
