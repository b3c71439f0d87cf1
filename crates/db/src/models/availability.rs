//! Recurring weekly availability windows.

use chrono::NaiveTime;
use fitslot_core::availability::{weekday_from_index, WeeklyWindow};
use fitslot_core::civil_time::minute_of;
use fitslot_core::interval::Interval;
use fitslot_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `availability_windows` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailabilityWindow {
    pub id: DbId,
    pub trainer_id: DbId,
    /// `0 = Sunday .. 6 = Saturday`.
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_online: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AvailabilityWindow {
    /// Minute-level view of the row. `None` for an out-of-range weekday.
    pub fn to_weekly(&self) -> Option<WeeklyWindow> {
        Some(WeeklyWindow {
            weekday: weekday_from_index(self.weekday)?,
            span: Interval::new(minute_of(self.start_time), minute_of(self.end_time)),
            is_online: self.is_online,
        })
    }
}

/// DTO for creating or replacing a window.
#[derive(Debug, Clone)]
pub struct NewAvailabilityWindow {
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_online: bool,
}
