//! Handlers for a trainer's recurring weekly availability windows.
//!
//! Every mutation publishes `availability.changed` so the trainer's open
//! slots are regenerated.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fitslot_core::availability::validate_weekday;
use fitslot_core::error::CoreError;
use fitslot_core::types::DbId;
use fitslot_db::models::availability::NewAvailabilityWindow;
use fitslot_events::bus::AVAILABILITY_CHANGED;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::{ensure_trainer, not_found, parse_time_range};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of window create/replace requests.
#[derive(Debug, Deserialize)]
pub struct WindowRequest {
    /// `0 = Sunday .. 6 = Saturday`.
    pub weekday: i16,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub is_online: bool,
}

impl WindowRequest {
    fn validate(&self) -> Result<NewAvailabilityWindow, CoreError> {
        validate_weekday(self.weekday)?;
        let (start_time, end_time) = parse_time_range(&self.start, &self.end)?;
        Ok(NewAvailabilityWindow {
            weekday: self.weekday,
            start_time,
            end_time,
            is_online: self.is_online,
        })
    }
}

/// GET /api/v1/trainers/{id}/availability
pub async fn list_windows(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_trainer(&state, trainer_id).await?;
    let windows = state.store().list_windows(trainer_id).await?;
    Ok(Json(DataResponse { data: windows }))
}

/// POST /api/v1/trainers/{id}/availability
pub async fn create_window(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Json(input): Json<WindowRequest>,
) -> AppResult<impl IntoResponse> {
    let new_window = input.validate()?;
    ensure_trainer(&state, trainer_id).await?;

    let window = state.store().create_window(trainer_id, &new_window).await?;

    tracing::info!(trainer_id, window_id = window.id, weekday = window.weekday, "Availability window created");
    state.publish(AVAILABILITY_CHANGED, trainer_id, json!({ "window_id": window.id }));

    Ok((StatusCode::CREATED, Json(DataResponse { data: window })))
}

/// PUT /api/v1/trainers/{id}/availability/{window_id}
pub async fn update_window(
    State(state): State<AppState>,
    Path((trainer_id, window_id)): Path<(DbId, DbId)>,
    Json(input): Json<WindowRequest>,
) -> AppResult<impl IntoResponse> {
    let new_window = input.validate()?;

    let window = state
        .store()
        .update_window(trainer_id, window_id, &new_window)
        .await?
        .ok_or_else(|| not_found("AvailabilityWindow", window_id))?;

    tracing::info!(trainer_id, window_id, "Availability window updated");
    state.publish(AVAILABILITY_CHANGED, trainer_id, json!({ "window_id": window_id }));

    Ok(Json(DataResponse { data: window }))
}

/// DELETE /api/v1/trainers/{id}/availability/{window_id}
pub async fn delete_window(
    State(state): State<AppState>,
    Path((trainer_id, window_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !state.store().delete_window(trainer_id, window_id).await? {
        return Err(not_found("AvailabilityWindow", window_id).into());
    }

    tracing::info!(trainer_id, window_id, "Availability window deleted");
    state.publish(AVAILABILITY_CHANGED, trainer_id, json!({ "window_id": window_id }));

    Ok(StatusCode::NO_CONTENT)
}
