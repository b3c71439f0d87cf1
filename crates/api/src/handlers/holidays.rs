//! Handlers for holidays: inclusive date ranges with no bookings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use fitslot_core::availability::validate_date_range;
use fitslot_core::types::DbId;
use fitslot_db::models::holiday::NewHoliday;
use fitslot_events::bus::HOLIDAYS_CHANGED;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::{ensure_trainer, not_found};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HolidayRequest {
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub reason: Option<String>,
}

/// GET /api/v1/trainers/{id}/holidays
pub async fn list_holidays(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_trainer(&state, trainer_id).await?;
    let holidays = state.store().list_holidays(trainer_id).await?;
    Ok(Json(DataResponse { data: holidays }))
}

/// POST /api/v1/trainers/{id}/holidays
pub async fn create_holiday(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Json(input): Json<HolidayRequest>,
) -> AppResult<impl IntoResponse> {
    validate_date_range(input.starts_on, input.ends_on)?;
    ensure_trainer(&state, trainer_id).await?;

    let holiday = state
        .store()
        .create_holiday(
            trainer_id,
            &NewHoliday {
                starts_on: input.starts_on,
                ends_on: input.ends_on,
                reason: input.reason.filter(|r| !r.trim().is_empty()),
            },
        )
        .await?;

    tracing::info!(
        trainer_id,
        holiday_id = holiday.id,
        starts_on = %holiday.starts_on,
        ends_on = %holiday.ends_on,
        "Holiday created",
    );
    state.publish(HOLIDAYS_CHANGED, trainer_id, json!({ "holiday_id": holiday.id }));

    Ok((StatusCode::CREATED, Json(DataResponse { data: holiday })))
}

/// DELETE /api/v1/trainers/{id}/holidays/{holiday_id}
pub async fn delete_holiday(
    State(state): State<AppState>,
    Path((trainer_id, holiday_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !state.store().delete_holiday(trainer_id, holiday_id).await? {
        return Err(not_found("Holiday", holiday_id).into());
    }

    tracing::info!(trainer_id, holiday_id, "Holiday deleted");
    state.publish(HOLIDAYS_CHANGED, trainer_id, json!({ "holiday_id": holiday_id }));

    Ok(StatusCode::NO_CONTENT)
}
