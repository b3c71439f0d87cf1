//! Weekly availability, breaks, holidays and schedule settings.
//!
//! Resolves which minute ranges of a given civil date a trainer is bookable,
//! before busy intervals are taken into account.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::civil_time::MINUTES_PER_DAY;
use crate::error::CoreError;
use crate::interval::{subtract, Interval};
use crate::types::Minute;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default session length when a trainer has not saved settings.
pub const DEFAULT_SLOT_MINUTES: Minute = 60;

/// Default gap between consecutive sessions.
pub const DEFAULT_BREAK_MINUTES: Minute = 0;

pub const MIN_SLOT_MINUTES: Minute = 5;
pub const MAX_SLOT_MINUTES: Minute = 480;
pub const MAX_BREAK_MINUTES: Minute = 240;

// ---------------------------------------------------------------------------
// Weekday encoding
// ---------------------------------------------------------------------------

/// Stored weekday index, `0 = Sunday .. 6 = Saturday`.
pub fn weekday_index(weekday: Weekday) -> i16 {
    weekday.num_days_from_sunday() as i16
}

/// Inverse of [`weekday_index`].
pub fn weekday_from_index(index: i16) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Validate a stored weekday index.
pub fn validate_weekday(index: i16) -> Result<Weekday, CoreError> {
    weekday_from_index(index).ok_or_else(|| {
        CoreError::Validation(format!("weekday must be 0 (Sunday) to 6 (Saturday), got {index}"))
    })
}

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// A recurring weekly open period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyWindow {
    pub weekday: Weekday,
    pub span: Interval,
    pub is_online: bool,
}

/// A recurring unavailable period. `weekday = None` applies every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringBreak {
    pub weekday: Option<Weekday>,
    pub span: Interval,
}

impl RecurringBreak {
    pub fn applies_on(&self, weekday: Weekday) -> bool {
        self.weekday.map_or(true, |w| w == weekday)
    }
}

/// An inclusive date range during which the trainer takes no bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayRange {
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

impl HolidayRange {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.starts_on <= date && date <= self.ends_on
    }
}

/// Per-trainer slot length and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    pub slot_minutes: Minute,
    pub break_minutes: Minute,
}

impl ScheduleSettings {
    /// Distance between the starts of consecutive candidate slots.
    pub fn step(&self) -> Minute {
        self.slot_minutes + self.break_minutes
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&self.slot_minutes) {
            return Err(CoreError::Validation(format!(
                "slot_minutes must be between {MIN_SLOT_MINUTES} and {MAX_SLOT_MINUTES}, got {}",
                self.slot_minutes
            )));
        }
        if self.break_minutes > MAX_BREAK_MINUTES {
            return Err(CoreError::Validation(format!(
                "break_minutes must be at most {MAX_BREAK_MINUTES}, got {}",
                self.break_minutes
            )));
        }
        Ok(())
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            slot_minutes: DEFAULT_SLOT_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

// ---------------------------------------------------------------------------
// Range validation
// ---------------------------------------------------------------------------

/// Reject time ranges whose end is not after their start.
pub fn validate_time_range(start: Minute, end: Minute) -> Result<Interval, CoreError> {
    if end <= start {
        return Err(CoreError::InvalidRange(format!(
            "end ({end}) must be after start ({start})"
        )));
    }
    if end > MINUTES_PER_DAY {
        return Err(CoreError::InvalidRange(format!(
            "end ({end}) must not exceed {MINUTES_PER_DAY}"
        )));
    }
    Ok(Interval::new(start, end))
}

/// Reject holiday ranges ending before they start.
pub fn validate_date_range(starts_on: NaiveDate, ends_on: NaiveDate) -> Result<(), CoreError> {
    if ends_on < starts_on {
        return Err(CoreError::InvalidRange(format!(
            "ends_on ({ends_on}) must not be before starts_on ({starts_on})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Day resolution
// ---------------------------------------------------------------------------

/// The recurring rules of one trainer's schedule.
#[derive(Debug, Clone, Default)]
pub struct TrainerSchedule {
    pub windows: Vec<WeeklyWindow>,
    pub breaks: Vec<RecurringBreak>,
    pub holidays: Vec<HolidayRange>,
    pub settings: ScheduleSettings,
}

/// A bookable piece of one day: a window with breaks punched out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub span: Interval,
    pub is_online: bool,
}

impl TrainerSchedule {
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.covers(date))
    }

    /// Bookable pieces of `date`, in window order.
    ///
    /// Empty on holidays and on weekdays without a window.
    pub fn day_windows(&self, date: NaiveDate) -> Vec<DayWindow> {
        if self.is_holiday(date) {
            return Vec::new();
        }

        let weekday = date.weekday();
        let cuts: Vec<Interval> = self
            .breaks
            .iter()
            .filter(|b| b.applies_on(weekday))
            .map(|b| b.span)
            .collect();

        self.windows
            .iter()
            .filter(|w| w.weekday == weekday)
            .flat_map(|w| {
                subtract(&[w.span], &cuts)
                    .into_iter()
                    .map(move |span| DayWindow { span, is_online: w.is_online })
            })
            .collect()
    }

    /// Whether `proposed` lies fully inside one bookable piece of `date`.
    pub fn is_bookable(&self, date: NaiveDate, proposed: Interval) -> bool {
        self.day_windows(date)
            .iter()
            .any(|piece| piece.span.contains(&proposed))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(weekday: Weekday, start: Minute, end: Minute) -> WeeklyWindow {
        WeeklyWindow {
            weekday,
            span: Interval::new(start, end),
            is_online: false,
        }
    }

    #[test]
    fn weekday_index_is_sunday_based() {
        assert_eq!(weekday_index(Weekday::Sun), 0);
        assert_eq!(weekday_index(Weekday::Sat), 6);
        assert_eq!(weekday_from_index(1), Some(Weekday::Mon));
        assert_eq!(weekday_from_index(7), None);
        assert!(validate_weekday(-1).is_err());
    }

    #[test]
    fn step_adds_break_to_slot() {
        let settings = ScheduleSettings { slot_minutes: 50, break_minutes: 10 };
        assert_eq!(settings.step(), 60);
        assert_eq!(ScheduleSettings::default().step(), 60);
    }

    #[test]
    fn settings_bounds_are_enforced() {
        assert!(ScheduleSettings { slot_minutes: 0, break_minutes: 0 }.validate().is_err());
        assert!(ScheduleSettings { slot_minutes: 60, break_minutes: 241 }.validate().is_err());
        assert!(ScheduleSettings { slot_minutes: 45, break_minutes: 15 }.validate().is_ok());
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        assert_matches!(validate_time_range(600, 600), Err(CoreError::InvalidRange(_)));
        assert_matches!(validate_time_range(600, 1441), Err(CoreError::InvalidRange(_)));
        assert!(validate_time_range(480, 600).is_ok());
        assert_matches!(
            validate_date_range(date(2024, 7, 12), date(2024, 7, 10)),
            Err(CoreError::InvalidRange(_))
        );
        assert!(validate_date_range(date(2024, 7, 10), date(2024, 7, 10)).is_ok());
    }

    #[test]
    fn holiday_range_is_inclusive() {
        let holiday = HolidayRange { starts_on: date(2024, 7, 10), ends_on: date(2024, 7, 12) };
        assert!(!holiday.covers(date(2024, 7, 9)));
        assert!(holiday.covers(date(2024, 7, 10)));
        assert!(holiday.covers(date(2024, 7, 12)));
        assert!(!holiday.covers(date(2024, 7, 13)));
    }

    #[test]
    fn day_windows_match_weekday_and_drop_breaks() {
        // 2024-07-08 is a Monday.
        let schedule = TrainerSchedule {
            windows: vec![window(Weekday::Mon, 480, 720), window(Weekday::Tue, 480, 720)],
            breaks: vec![RecurringBreak { weekday: None, span: Interval::new(600, 615) }],
            ..Default::default()
        };

        let pieces: Vec<_> = schedule
            .day_windows(date(2024, 7, 8))
            .iter()
            .map(|p| p.span)
            .collect();
        assert_eq!(pieces, vec![Interval::new(480, 600), Interval::new(615, 720)]);
    }

    #[test]
    fn weekday_specific_break_only_applies_that_day() {
        let schedule = TrainerSchedule {
            windows: vec![window(Weekday::Mon, 480, 720), window(Weekday::Tue, 480, 720)],
            breaks: vec![RecurringBreak {
                weekday: Some(Weekday::Tue),
                span: Interval::new(600, 660),
            }],
            ..Default::default()
        };
        assert_eq!(schedule.day_windows(date(2024, 7, 8)).len(), 1);
        assert_eq!(schedule.day_windows(date(2024, 7, 9)).len(), 2);
    }

    #[test]
    fn holidays_and_unmatched_weekdays_have_no_windows() {
        let schedule = TrainerSchedule {
            windows: vec![window(Weekday::Mon, 480, 720)],
            holidays: vec![HolidayRange { starts_on: date(2024, 7, 8), ends_on: date(2024, 7, 8) }],
            ..Default::default()
        };
        assert!(schedule.day_windows(date(2024, 7, 8)).is_empty());
        assert!(schedule.day_windows(date(2024, 7, 9)).is_empty());
        assert!(!schedule.day_windows(date(2024, 7, 15)).is_empty());
    }

    #[test]
    fn bookable_requires_a_single_containing_piece() {
        let schedule = TrainerSchedule {
            windows: vec![window(Weekday::Mon, 480, 720)],
            breaks: vec![RecurringBreak { weekday: None, span: Interval::new(600, 615) }],
            ..Default::default()
        };
        let monday = date(2024, 7, 8);
        assert!(schedule.is_bookable(monday, Interval::new(540, 600)));
        assert!(!schedule.is_bookable(monday, Interval::new(570, 630)));
        assert!(!schedule.is_bookable(monday, Interval::new(700, 760)));
    }
}
