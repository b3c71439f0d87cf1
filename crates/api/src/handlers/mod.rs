//! Request handlers, one module per resource.
//!
//! Request bodies carry times as `HH:MM` strings; helpers here turn them
//! into minutes and `TIME` values.

pub mod availability;
pub mod bookings;
pub mod breaks;
pub mod holidays;
pub mod open_slots;
pub mod settings;
pub mod slots;
pub mod trainers;

use chrono::NaiveTime;
use fitslot_core::availability::validate_time_range;
use fitslot_core::civil_time::{parse_hhmm, time_of};
use fitslot_core::error::CoreError;
use fitslot_core::interval::Interval;
use fitslot_core::types::{DbId, Minute};
use fitslot_db::models::trainer::Trainer;

use crate::error::AppResult;
use crate::state::AppState;

/// Parse an `HH:MM` / `HH:MM:SS` field.
pub(crate) fn parse_minute(field: &str, raw: &str) -> Result<Minute, CoreError> {
    parse_hhmm(raw).ok_or_else(|| {
        CoreError::Validation(format!("{field} must be a 24-hour HH:MM time, got '{raw}'"))
    })
}

/// Parse and validate a `start`/`end` pair into `TIME` values.
pub(crate) fn parse_time_range(start: &str, end: &str) -> Result<(NaiveTime, NaiveTime), CoreError> {
    let span = validate_time_range(parse_minute("start", start)?, parse_minute("end", end)?)?;
    to_times(span)
}

fn to_times(span: Interval) -> Result<(NaiveTime, NaiveTime), CoreError> {
    match (time_of(span.start), time_of(span.end)) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(CoreError::InvalidRange(format!(
            "Range {}-{} does not fit in one day",
            span.start, span.end
        ))),
    }
}

/// Load a trainer or fail with 404.
pub(crate) async fn ensure_trainer(state: &AppState, trainer_id: DbId) -> AppResult<Trainer> {
    Ok(fitslot_worker::schedule::require_trainer(state.store(), trainer_id).await?)
}

/// 404 for a child row missing under `trainer_id`.
pub(crate) fn not_found(entity: &'static str, id: DbId) -> CoreError {
    CoreError::NotFound { entity, id }
}
