//! Conversions between `HH:MM` strings, [`NaiveTime`] and minutes of day.
//!
//! All schedule arithmetic happens on [`Minute`] values. Strings only appear
//! at the HTTP boundary and `TIME` columns only at the storage boundary.

use chrono::{NaiveTime, Timelike};

use crate::types::Minute;

/// Number of minutes in a civil day. Interval ends may equal this value.
pub const MINUTES_PER_DAY: Minute = 1440;

/// Parse a 24-hour `HH:MM` or `HH:MM:SS` string into minutes since midnight.
///
/// Seconds are validated but truncated. Returns `None` for anything
/// malformed instead of falling back to midnight.
pub fn parse_hhmm(input: &str) -> Option<Minute> {
    let mut parts = input.trim().split(':');
    let hours = parse_component(parts.next()?, 23)?;
    let minutes = parse_component(parts.next()?, 59)?;
    if let Some(seconds) = parts.next() {
        parse_component(seconds, 59)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(hours * 60 + minutes)
}

fn parse_component(raw: &str, max: u32) -> Option<u32> {
    if raw.len() != 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok().filter(|v| *v <= max)
}

/// Format minutes since midnight as `HH:MM`.
pub fn format_hhmm(minute: Minute) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Minutes since midnight for a `TIME` value (seconds truncated).
pub fn minute_of(time: NaiveTime) -> Minute {
    time.hour() * 60 + time.minute()
}

/// The `TIME` value for a minute of day. `None` at or beyond midnight.
pub fn time_of(minute: Minute) -> Option<NaiveTime> {
    if minute >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_and_minutes() {
        assert_eq!(parse_hhmm("08:00"), Some(480));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("00:00"), Some(0));
    }

    #[test]
    fn parses_and_truncates_seconds() {
        assert_eq!(parse_hhmm("10:15:30"), Some(615));
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in ["", "8:00", "24:00", "12:60", "ab:cd", "10:00:61", "10:00:00:00", "1000"] {
            assert_eq!(parse_hhmm(raw), None, "{raw:?} should be rejected");
        }
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_hhmm(485), "08:05");
        assert_eq!(format_hhmm(0), "00:00");
    }

    #[test]
    fn converts_naive_time() {
        let t = NaiveTime::from_hms_opt(10, 15, 42).unwrap();
        assert_eq!(minute_of(t), 615);
        assert_eq!(time_of(615), NaiveTime::from_hms_opt(10, 15, 0));
        assert_eq!(time_of(MINUTES_PER_DAY), None);
    }
}
