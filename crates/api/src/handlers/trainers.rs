//! Trainer registration and lookup.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fitslot_core::error::CoreError;
use fitslot_core::timezone::parse_timezone;
use fitslot_core::types::DbId;
use fitslot_db::models::trainer::CreateTrainer;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::ensure_trainer;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTrainerRequest {
    pub name: String,
    /// IANA timezone; defaults to the server's `DEFAULT_TIMEZONE`.
    pub timezone: Option<String>,
}

/// POST /api/v1/trainers
pub async fn create_trainer(
    State(state): State<AppState>,
    Json(input): Json<CreateTrainerRequest>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()).into());
    }
    let timezone = input
        .timezone
        .as_deref()
        .unwrap_or(&state.config.default_timezone);
    let tz = parse_timezone(timezone)?;

    let trainer = state
        .store()
        .create_trainer(&CreateTrainer {
            name: name.to_string(),
            timezone: tz.name().to_string(),
        })
        .await?;

    tracing::info!(trainer_id = trainer.id, timezone = %trainer.timezone, "Trainer created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: trainer })))
}

/// GET /api/v1/trainers/{id}
pub async fn get_trainer(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let trainer = ensure_trainer(&state, trainer_id).await?;
    Ok(Json(DataResponse { data: trainer }))
}
