//! Booking handlers: client requests, trainer quick-book and status changes.
//!
//! Creation goes through the two-phase flow in
//! [`fitslot_worker::booking`]; a request that loses a race for the same
//! interval gets `409 CONFLICT`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use fitslot_core::booking::{BookingOrigin, BookingStatus};
use fitslot_core::error::CoreError;
use fitslot_core::types::{DbId, Minute};
use fitslot_db::models::booking::Booking;
use fitslot_events::bus::{BOOKING_CREATED, BOOKING_STATUS_CHANGED};
use fitslot_worker::booking::{book, transition_booking, BookingRequest};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::{ensure_trainer, not_found, parse_minute};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of client bookings and trainer quick-books.
///
/// `end` wins over `duration_minutes`; with neither, the trainer's slot
/// length is used.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub user_id: Option<DbId>,
    pub date: NaiveDate,
    pub start: String,
    pub end: Option<String>,
    pub duration_minutes: Option<Minute>,
    #[serde(default)]
    pub is_online: bool,
    pub note: Option<String>,
}

impl CreateBookingRequest {
    fn into_request(self, trainer_id: DbId) -> Result<BookingRequest, CoreError> {
        let start = parse_minute("start", &self.start)?;
        let end = self
            .end
            .as_deref()
            .map(|raw| parse_minute("end", raw))
            .transpose()?;
        Ok(BookingRequest {
            trainer_id,
            user_id: self.user_id,
            date: self.date,
            start,
            end,
            duration: self.duration_minutes,
            is_online: self.is_online,
            note: self.note,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// `accepted`, `declined` or `cancelled`.
    pub status: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/trainers/{id}/bookings?from=&to=
pub async fn list_bookings(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let (from, to) = params.validated()?;
    ensure_trainer(&state, trainer_id).await?;
    let bookings = state.store().list_bookings(trainer_id, from, to).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// POST /api/v1/trainers/{id}/bookings
///
/// Client self-service booking. Must lie inside the trainer's availability
/// for that day; stored as `pending`.
pub async fn create_booking(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    let booking = create(&state, trainer_id, input, BookingOrigin::Client).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// POST /api/v1/trainers/{id}/quick-book
///
/// Trainer-initiated booking, stored as `accepted`.
pub async fn quick_book(
    State(state): State<AppState>,
    Path(trainer_id): Path<DbId>,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    let booking = create(&state, trainer_id, input, BookingOrigin::Trainer).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

async fn create(
    state: &AppState,
    trainer_id: DbId,
    input: CreateBookingRequest,
    origin: BookingOrigin,
) -> AppResult<Booking> {
    let request = input.into_request(trainer_id)?;
    let booking = book(state.store(), &request, origin, Utc::now()).await?;

    state.publish(
        BOOKING_CREATED,
        trainer_id,
        json!({ "booking_id": booking.id, "date": booking.booking_date }),
    );
    Ok(booking)
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = state
        .store()
        .find_booking(booking_id)
        .await?
        .ok_or_else(|| not_found("Booking", booking_id))?;
    Ok(Json(DataResponse { data: booking }))
}

/// PUT /api/v1/bookings/{id}/status
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let to: BookingStatus = input.status.parse()?;
    let booking = transition_booking(state.store(), booking_id, to, Utc::now()).await?;

    state.publish(
        BOOKING_STATUS_CHANGED,
        booking.trainer_id,
        json!({ "booking_id": booking.id, "status": booking.status }),
    );
    Ok(Json(DataResponse { data: booking }))
}
