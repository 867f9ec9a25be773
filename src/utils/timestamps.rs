use chrono::{Duration, NaiveDateTime, Timelike};

use crate::utils::constants::{MICROS_FORMAT, SECONDS_FORMAT, UTC_MICROS_FORMAT};

/// Render an instant as a UTC timestamp with microsecond precision
///
/// Sub-microsecond parts are rounded to the nearest microsecond, carrying into
/// the seconds when needed.
///
/// # Examples
/// ```
/// use chrono::NaiveDateTime;
/// use points2postgis::utils::format_utc_micros;
///
/// let t: NaiveDateTime = "2025-01-30T10:50:08.405699968".parse().unwrap();
/// assert_eq!(format_utc_micros(t), "2025-01-30 10:50:08.405700+00:00");
/// ```
pub fn format_utc_micros(instant: NaiveDateTime) -> String {
    round_to_micros(instant).format(UTC_MICROS_FORMAT).to_string()
}

/// Render a naive instant the way PostGIS reads plain `timestamp` literals
///
/// The fraction is only written when the instant has a non-zero microsecond
/// part; nanoseconds below that are dropped.
pub fn format_naive(instant: NaiveDateTime) -> String {
    let micros = instant.nanosecond() / 1_000;
    if micros == 0 {
        instant.format(SECONDS_FORMAT).to_string()
    } else {
        let truncated = instant - Duration::nanoseconds((instant.nanosecond() % 1_000) as i64);
        truncated.format(MICROS_FORMAT).to_string()
    }
}

fn round_to_micros(instant: NaiveDateTime) -> NaiveDateTime {
    let nanos = instant.nanosecond() as i64;
    let micros = (nanos + 500) / 1_000;
    instant - Duration::nanoseconds(nanos) + Duration::microseconds(micros)
}
