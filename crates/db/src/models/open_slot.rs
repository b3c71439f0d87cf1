use chrono::{NaiveDate, NaiveTime};
use fitslot_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Status written on every materialized row.
pub const OPEN_SLOT_STATUS: &str = "open";

/// A row from the `open_slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OpenSlot {
    pub id: DbId,
    pub trainer_id: DbId,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_online: bool,
    pub status: String,
    pub generated_at: Timestamp,
}

/// DTO for upserting a materialized slot keyed by
/// `(trainer_id, slot_date, start_time)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOpenSlot {
    pub trainer_id: DbId,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_online: bool,
}

/// Outcome of replacing a trainer's open slots over a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaceOutcome {
    /// Rows inserted or changed. Unchanged rows are not counted.
    pub upserted: u64,
    /// Stale rows removed from the range.
    pub deleted: u64,
}
