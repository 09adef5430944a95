//! Clock-time parsing utilities
//!
//! Two leaf parsers shared by both resolution passes: absolute times of day
//! and signed durations written in clock notation (`-01:30:00`). If a value
//! cannot be parsed unambiguously, we return an error rather than guessing.

use chrono::{Duration, NaiveTime, Timelike};

use super::error::{ResolveError, ResolveResult};

/// Accepted clock-time notations, tried in order
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Parse an absolute time of day.
///
/// `field` names the input field being parsed and is carried into the error.
pub fn parse_time_of_day(value: &str, field: &'static str) -> ResolveResult<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .ok_or_else(|| ResolveError::MalformedTime {
            field,
            value: value.to_string(),
        })
}

/// Parse a signed clock-time string into a duration.
///
/// An optional leading `+` or `-` gives the sign (absent means positive);
/// the remainder must parse as a time of day supplying the hour, minute and
/// second magnitudes. Sub-second precision is not honored.
pub fn parse_signed_duration(text: &str) -> ResolveResult<Duration> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(unsigned.trim(), format).ok())
        .ok_or_else(|| ResolveError::MalformedDuration(text.to_string()))?;

    let seconds = i64::from(magnitude.num_seconds_from_midnight());
    Ok(Duration::seconds(if negative { -seconds } else { seconds }))
}
