//! Trainer-local civil time.
//!
//! Schedules are expressed in the trainer's declared IANA timezone. These
//! helpers turn a UTC instant into that trainer's civil date and minute.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::civil_time::minute_of;
use crate::error::CoreError;
use crate::types::{Minute, Timestamp};

/// Timezone assigned to trainers that do not declare one.
pub const DEFAULT_TIMEZONE: &str = "Europe/Athens";

/// Parse an IANA timezone identifier.
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("Unknown timezone: '{name}'")))
}

/// A UTC instant seen as a civil date and minute in `tz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilInstant {
    pub date: NaiveDate,
    pub minute: Minute,
}

pub fn civil_instant(tz: Tz, now: Timestamp) -> CivilInstant {
    let local = now.with_timezone(&tz);
    CivilInstant {
        date: local.date_naive(),
        minute: minute_of(local.time()),
    }
}

/// Today's civil date in `tz`.
pub fn civil_today(tz: Tz, now: Timestamp) -> NaiveDate {
    civil_instant(tz, now).date
}

/// Whether a booking ending at `end_minute` on `date` has already finished
/// in `tz` at `now`.
pub fn has_elapsed(tz: Tz, date: NaiveDate, end_minute: Minute, now: Timestamp) -> bool {
    let current = civil_instant(tz, now);
    date < current.date || (date == current.date && end_minute <= current.minute)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn parses_known_zones() {
        assert!(parse_timezone(DEFAULT_TIMEZONE).is_ok());
        assert!(parse_timezone("America/New_York").is_ok());
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn civil_today_follows_the_trainer_zone() {
        let athens = parse_timezone("Europe/Athens").unwrap();
        let la = parse_timezone("America/Los_Angeles").unwrap();
        // 22:30 UTC on July 10th is 01:30 on July 11th in Athens (UTC+3)
        // and 15:30 on July 10th in Los Angeles (UTC-7).
        let instant = utc(2024, 7, 10, 22, 30);
        assert_eq!(civil_today(athens, instant), NaiveDate::from_ymd_opt(2024, 7, 11).unwrap());
        assert_eq!(civil_today(la, instant), NaiveDate::from_ymd_opt(2024, 7, 10).unwrap());
        assert_eq!(civil_instant(athens, instant).minute, 90);
    }

    #[test]
    fn elapsed_compares_date_then_minute() {
        let athens = parse_timezone("Europe/Athens").unwrap();
        let instant = utc(2024, 7, 10, 7, 0); // 10:00 local
        let day = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        assert!(has_elapsed(athens, day, 600, instant));
        assert!(!has_elapsed(athens, day, 601, instant));
        assert!(has_elapsed(athens, day.pred_opt().unwrap(), 1439, instant));
        assert!(!has_elapsed(athens, day.succ_opt().unwrap(), 0, instant));
    }
}
