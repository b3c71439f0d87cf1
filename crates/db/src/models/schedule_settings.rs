use fitslot_core::availability::ScheduleSettings as CoreSettings;
use fitslot_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `schedule_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleSettings {
    pub trainer_id: DbId,
    pub slot_minutes: i32,
    pub break_minutes: i32,
    pub updated_at: Timestamp,
}

impl ScheduleSettings {
    pub fn to_core(&self) -> CoreSettings {
        CoreSettings {
            slot_minutes: self.slot_minutes.max(0) as u32,
            break_minutes: self.break_minutes.max(0) as u32,
        }
    }
}
