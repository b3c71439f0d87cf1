//! Handlers for recurring breaks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fitslot_core::availability::validate_weekday;
use fitslot_core::types::DbId;
use fitslot_db::models::schedule_break::NewScheduleBreak;
use fitslot_events::bus::BREAKS_CHANGED;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::{ensure_trainer, not_found, parse_time_range};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BreakRequest {
    /// `0 = Sunday .. 6 = Saturday`; omitted for a daily break.
    pub weekday: Option<i16>,
    pub start: String,
    pub end: String,
}

/// GET /api/v1/trainers/{id}/breaks
pub async fn list_breaks(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_trainer(&state, trainer_id).await?;
    let breaks = state.store().list_breaks(trainer_id).await?;
    Ok(Json(DataResponse { data: breaks }))
}

/// POST /api/v1/trainers/{id}/breaks
pub async fn create_break(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Json(input): Json<BreakRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(weekday) = input.weekday {
        validate_weekday(weekday)?;
    }
    let (start_time, end_time) = parse_time_range(&input.start, &input.end)?;
    ensure_trainer(&state, trainer_id).await?;

    let row = state
        .store()
        .create_break(
            trainer_id,
            &NewScheduleBreak {
                weekday: input.weekday,
                start_time,
                end_time,
            },
        )
        .await?;

    tracing::info!(trainer_id, break_id = row.id, "Break created");
    state.publish(BREAKS_CHANGED, trainer_id, json!({ "break_id": row.id }));

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// DELETE /api/v1/trainers/{id}/breaks/{break_id}
pub async fn delete_break(
    State(state): State<AppState>,
    Path((trainer_id, break_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !state.store().delete_break(trainer_id, break_id).await? {
        return Err(not_found("Break", break_id).into());
    }

    tracing::info!(trainer_id, break_id, "Break deleted");
    state.publish(BREAKS_CHANGED, trainer_id, json!({ "break_id": break_id }));

    Ok(StatusCode::NO_CONTENT)
}
