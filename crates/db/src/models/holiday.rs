use chrono::NaiveDate;
use fitslot_core::availability::HolidayRange;
use fitslot_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `holidays` table. Both bounds are inclusive.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Holiday {
    pub id: DbId,
    pub trainer_id: DbId,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

impl Holiday {
    pub fn to_range(&self) -> HolidayRange {
        HolidayRange {
            starts_on: self.starts_on,
            ends_on: self.ends_on,
        }
    }
}

/// DTO for creating a holiday.
#[derive(Debug, Clone)]
pub struct NewHoliday {
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub reason: Option<String>,
}
