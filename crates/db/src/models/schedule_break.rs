use chrono::NaiveTime;
use fitslot_core::availability::{weekday_from_index, RecurringBreak};
use fitslot_core::civil_time::minute_of;
use fitslot_core::interval::Interval;
use fitslot_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `schedule_breaks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleBreak {
    pub id: DbId,
    pub trainer_id: DbId,
    /// `None` applies the break every day.
    pub weekday: Option<i16>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: Timestamp,
}

impl ScheduleBreak {
    pub fn to_recurring(&self) -> Option<RecurringBreak> {
        let weekday = match self.weekday {
            Some(index) => Some(weekday_from_index(index)?),
            None => None,
        };
        Some(RecurringBreak {
            weekday,
            span: Interval::new(minute_of(self.start_time), minute_of(self.end_time)),
        })
    }
}

/// DTO for creating a break.
#[derive(Debug, Clone)]
pub struct NewScheduleBreak {
    pub weekday: Option<i16>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}
