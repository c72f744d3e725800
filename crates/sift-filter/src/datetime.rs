//! Defensive date normalization.
//!
//! Callers sometimes pass dates as pre-formatted strings. When such a
//! string is addressed at a `Date`-kinded field, dialects re-parse it and
//! re-emit it in their canonical timestamp format instead of trusting the
//! caller's spelling. A string that matches the date shape but is not a
//! valid calendar date is a hard error, never emitted verbatim.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{FilterError, FilterResult};

/// Shape of an ISO-8601 date or timestamp string
static DATE_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?)?$").unwrap()
});

/// Fast check whether a string is shaped like a date or timestamp.
pub fn looks_like_date(text: &str) -> bool {
    DATE_SHAPE_RE.is_match(text)
}

/// Parse a date-shaped string into a UTC timestamp.
///
/// Accepts RFC 3339 timestamps, zone-less `YYYY-MM-DDTHH:MM:SS` (assumed
/// UTC), and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date_text(text: &str) -> FilterResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(FilterError::InvalidDate(text.to_string()))
}

/// Canonical RFC 3339 rendering with second precision and `Z` suffix.
pub fn format_rfc3339_utc(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}
