//! Handlers for per-trainer slot length and spacing.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use fitslot_core::availability::ScheduleSettings;
use fitslot_core::types::{DbId, Minute};
use fitslot_events::bus::SETTINGS_CHANGED;
use serde::Serialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::ensure_trainer;
use crate::response::DataResponse;
use crate::state::AppState;

/// Effective settings; defaults when the trainer never saved any.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub trainer_id: DbId,
    pub slot_minutes: Minute,
    pub break_minutes: Minute,
    /// `false` when the values are the defaults.
    pub is_custom: bool,
}

/// GET /api/v1/trainers/{id}/settings
pub async fn get_settings(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_trainer(&state, trainer_id).await?;
    let stored = state.store().find_settings(trainer_id).await?;
    let settings = stored.as_ref().map(|s| s.to_core()).unwrap_or_default();

    Ok(Json(DataResponse {
        data: SettingsView {
            trainer_id,
            slot_minutes: settings.slot_minutes,
            break_minutes: settings.break_minutes,
            is_custom: stored.is_some(),
        },
    }))
}

/// PUT /api/v1/trainers/{id}/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Json(input): Json<ScheduleSettings>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_trainer(&state, trainer_id).await?;

    let saved = state.store().upsert_settings(trainer_id, &input).await?;

    tracing::info!(
        trainer_id,
        slot_minutes = input.slot_minutes,
        break_minutes = input.break_minutes,
        "Schedule settings updated",
    );
    state.publish(SETTINGS_CHANGED, trainer_id, json!(input));

    let settings = saved.to_core();
    Ok(Json(DataResponse {
        data: SettingsView {
            trainer_id,
            slot_minutes: settings.slot_minutes,
            break_minutes: settings.break_minutes,
            is_custom: true,
        },
    }))
}
