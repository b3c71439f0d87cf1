//! Open-slot planning for the rolling booking horizon.
//!
//! [`plan_open_slots`] is the pure half of the slot materializer: given a
//! trainer's recurring schedule and the busy intervals already booked, it
//! lists every open slot for each day of the horizon. Persisting the plan is
//! the caller's job.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};

use crate::availability::TrainerSchedule;
use crate::error::CoreError;
use crate::interval::Interval;
use crate::slots::build_slots;
use crate::types::Minute;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of days, starting today, covered by open slots.
pub const DEFAULT_HORIZON_DAYS: u32 = 180;

/// Upper bound accepted for a horizon.
pub const MAX_HORIZON_DAYS: u32 = 366;

/// Rows per upsert statement.
pub const UPSERT_BATCH_SIZE: usize = 500;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One open slot to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSlot {
    pub date: NaiveDate,
    pub start: Minute,
    pub end: Minute,
    pub is_online: bool,
}

/// The `[from, until)` date span of a horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl Horizon {
    /// `days` consecutive dates starting at `today`.
    pub fn starting(today: NaiveDate, days: u32) -> Result<Self, CoreError> {
        validate_horizon_days(days)?;
        let until = today
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or_else(|| CoreError::Validation(format!("Horizon of {days} days overflows")))?;
        Ok(Self { from: today, until })
    }

    /// Every date in the horizon, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let until = self.until;
        self.from.iter_days().take_while(move |d| *d < until)
    }

    /// The last date inside the horizon.
    pub fn last_day(&self) -> NaiveDate {
        self.until.pred_opt().unwrap_or(self.from)
    }
}

pub fn validate_horizon_days(days: u32) -> Result<(), CoreError> {
    if days == 0 || days > MAX_HORIZON_DAYS {
        return Err(CoreError::Validation(format!(
            "horizon_days must be between 1 and {MAX_HORIZON_DAYS}, got {days}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Plan the open slots for every day of `horizon`.
///
/// Holidays and days without a matching window are skipped. Each bookable
/// piece is sliced with the trainer's slot length and step; candidates
/// overlapping `busy_by_date` for their date are dropped. When overlapping
/// windows produce the same `(date, start)` the first one wins, so the plan
/// never contains two rows for one storage key.
pub fn plan_open_slots(
    schedule: &TrainerSchedule,
    horizon: &Horizon,
    busy_by_date: &HashMap<NaiveDate, Vec<Interval>>,
) -> Vec<PlannedSlot> {
    let duration = schedule.settings.slot_minutes;
    let step = schedule.settings.step();
    let mut planned = Vec::new();

    for date in horizon.dates() {
        let pieces = schedule.day_windows(date);
        if pieces.is_empty() {
            continue;
        }

        let busy = busy_by_date.get(&date).map(Vec::as_slice).unwrap_or(&[]);
        let mut seen_starts = HashSet::new();

        for piece in pieces {
            for slot in build_slots(&[piece.span], busy, duration, step) {
                if slot.available && seen_starts.insert(slot.start) {
                    planned.push(PlannedSlot {
                        date,
                        start: slot.start,
                        end: slot.end,
                        is_online: piece.is_online,
                    });
                }
            }
        }
    }

    planned
}

/// Split `rows` into upsert batches of at most [`UPSERT_BATCH_SIZE`].
pub fn upsert_batches<T>(rows: &[T]) -> std::slice::Chunks<'_, T> {
    rows.chunks(UPSERT_BATCH_SIZE)
}
