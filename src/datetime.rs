//! Date-string normalization and the compact `YYYYMMDDHHMM` timestamp codec.
//!
//! Incoming `at` parameters arrive in a handful of ISO-8601-ish encodings.
//! Parsing resolves them to a [`CanonicalInstant`] on the reference clock;
//! cached samples are keyed by the compact integer form of that instant.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::WeatherError;

/// Reference-clock timestamp with all offsets already resolved.
pub type CanonicalInstant = NaiveDateTime;

/// Ordered list of format matchers, tried in priority order. Each matcher
/// must consume the full input; the first one that does wins.
const MATCHERS: [fn(&str) -> Option<CanonicalInstant>; 4] = [
    parse_date_only,
    parse_utc_datetime,
    parse_offset_datetime,
    parse_compact_utc,
];

/// Parses a date string of unknown-but-constrained format.
///
/// Recognised encodings, in priority order:
/// 1. `YYYY-MM-DD` (midnight)
/// 2. `YYYY-MM-DDTHH:MM:SSZ`
/// 3. `YYYY-MM-DDTHH:MM:SS±HH:MM` (a space counts as `+`, the result of URL
///    decoding)
/// 4. `YYYYMMDDTHHMMSSZ`
pub fn parse_date_string(input: &str) -> Result<CanonicalInstant, WeatherError> {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(input))
        .ok_or_else(|| WeatherError::invalid_date(input))
}

fn parse_date_only(input: &str) -> Option<CanonicalInstant> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn parse_utc_datetime(input: &str) -> Option<CanonicalInstant> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%SZ").ok()
}

fn parse_compact_utc(input: &str) -> Option<CanonicalInstant> {
    NaiveDateTime::parse_from_str(input, "%Y%m%dT%H%M%SZ").ok()
}

/// Explicit-offset form: 19 bytes of base time, a sign, then `HH:MM`.
///
/// The sign rule is a load-bearing quirk: `+HH:MM` (or ` HH:MM`, since URL
/// decoding turns `+` into a space) shifts the base time forward by the
/// offset, `-HH:MM` shifts it back. `2020-02-15T20:53:15+03:02` resolves to
/// `2020-02-15T23:55:15`. Callers depend on these exact results; do not
/// replace this with standard UTC-offset arithmetic.
fn parse_offset_datetime(input: &str) -> Option<CanonicalInstant> {
    if input.len() != 25 || !input.is_char_boundary(19) {
        return None;
    }
    let (base, rest) = input.split_at(19);
    let base = NaiveDateTime::parse_from_str(base, "%Y-%m-%dT%H:%M:%S").ok()?;

    let (sign, offset) = rest.split_at(1);
    let (hours, minutes) = offset.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    let offset = Duration::hours(hours) + Duration::minutes(minutes);

    match sign {
        "+" | " " => Some(base + offset),
        "-" => Some(base - offset),
        _ => None,
    }
}

/// Encodes an instant as the compact `YYYYMMDDHHMM` integer. Seconds are
/// truncated; minute precision is all the cache keys on.
#[must_use]
pub fn to_compact_int(instant: &CanonicalInstant) -> i64 {
    i64::from(instant.year()) * 100_000_000
        + i64::from(instant.month()) * 1_000_000
        + i64::from(instant.day()) * 10_000
        + i64::from(instant.hour()) * 100
        + i64::from(instant.minute())
}

/// Decodes a compact `YYYYMMDDHHMM` integer back into an instant.
pub fn from_compact_int(value: i64) -> Result<CanonicalInstant, WeatherError> {
    let bad = || WeatherError::invalid_date(value.to_string());

    let year = i32::try_from(value / 100_000_000).map_err(|_| bad())?;
    let month = u32::try_from((value / 1_000_000) % 100).map_err(|_| bad())?;
    let day = u32::try_from((value / 10_000) % 100).map_err(|_| bad())?;
    let hour = u32::try_from((value / 100) % 100).map_err(|_| bad())?;
    let minute = u32::try_from(value % 100).map_err(|_| bad())?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(bad)?;
    Ok(NaiveDateTime::new(date, time))
}
