//! Routes mounted at `/bookings`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// ```text
/// GET    /{id}          -> get_booking
/// PUT    /{id}/status   -> update_booking_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/status", put(bookings::update_booking_status))
}
