//! The per-day slot view used by the trainer quick-book screen.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use fitslot_core::civil_time::format_hhmm;
use fitslot_core::slots::Slot;
use fitslot_core::types::{DbId, Minute};
use fitslot_worker::schedule::{day_slots as build_day_slots, DaySlots};
use serde::Serialize;

use crate::error::AppResult;
use crate::query::DaySlotsParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SlotView {
    pub start: String,
    pub end: String,
    pub start_minute: Minute,
    pub end_minute: Minute,
    pub available: bool,
}

impl From<&Slot> for SlotView {
    fn from(slot: &Slot) -> Self {
        Self {
            start: format_hhmm(slot.start),
            end: format_hhmm(slot.end),
            start_minute: slot.start,
            end_minute: slot.end,
            available: slot.available,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DaySlotsView {
    pub trainer_id: DbId,
    pub date: NaiveDate,
    pub duration_minutes: Minute,
    pub step_minutes: Minute,
    pub is_holiday: bool,
    pub slots: Vec<SlotView>,
}

impl From<DaySlots> for DaySlotsView {
    fn from(day: DaySlots) -> Self {
        Self {
            trainer_id: day.trainer_id,
            date: day.date,
            duration_minutes: day.duration_minutes,
            step_minutes: day.step_minutes,
            is_holiday: day.is_holiday,
            slots: day.slots.iter().map(SlotView::from).collect(),
        }
    }
}

/// GET /api/v1/trainers/{id}/slots?date=&duration=
///
/// Every candidate slot of the date with its availability flag.
pub async fn day_slots(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Query(params): Query<DaySlotsParams>,
) -> AppResult<impl IntoResponse> {
    let day = build_day_slots(state.store(), trainer_id, params.date, params.duration).await?;
    Ok(Json(DataResponse {
        data: DaySlotsView::from(day),
    }))
}
