//! Handlers for materialized open slots.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use fitslot_core::types::DbId;
use fitslot_worker::materializer::materialize;

use crate::error::AppResult;
use crate::handlers::ensure_trainer;
use crate::query::{DateRangeParams, RegenerateParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/trainers/{id}/open-slots?from=&to=
pub async fn list_open_slots(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let (from, to) = params.validated()?;
    ensure_trainer(&state, trainer_id).await?;
    let slots = state.store().list_open_slots(trainer_id, from, to).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// POST /api/v1/trainers/{id}/open-slots/regenerate?horizon_days=
///
/// Regenerate synchronously and return the report. An empty horizon is a
/// successful response with `is_empty = true`.
pub async fn regenerate_open_slots(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Query(params): Query<RegenerateParams>,
) -> AppResult<impl IntoResponse> {
    let horizon_days = params
        .horizon_days
        .unwrap_or(state.config.refresh.horizon_days);

    let report = materialize(state.store(), trainer_id, horizon_days, Utc::now()).await?;

    tracing::info!(
        trainer_id,
        horizon_days,
        generated = report.generated,
        upserted = report.upserted,
        deleted = report.deleted,
        "Open slots regenerated on request",
    );

    Ok(Json(DataResponse { data: report }))
}
