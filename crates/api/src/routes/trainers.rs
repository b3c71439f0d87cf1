//! Routes mounted at `/trainers`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{availability, bookings, breaks, holidays, open_slots, settings, slots, trainers};
use crate::state::AppState;

/// ```text
/// POST   /                                 -> create_trainer
/// GET    /{id}                             -> get_trainer
/// GET    /{id}/availability                -> list_windows
/// POST   /{id}/availability                -> create_window
/// PUT    /{id}/availability/{window_id}    -> update_window
/// DELETE /{id}/availability/{window_id}    -> delete_window
/// GET    /{id}/breaks                      -> list_breaks
/// POST   /{id}/breaks                      -> create_break
/// DELETE /{id}/breaks/{break_id}           -> delete_break
/// GET    /{id}/holidays                    -> list_holidays
/// POST   /{id}/holidays                    -> create_holiday
/// DELETE /{id}/holidays/{holiday_id}       -> delete_holiday
/// GET    /{id}/settings                    -> get_settings
/// PUT    /{id}/settings                    -> update_settings
/// GET    /{id}/slots                       -> day_slots
/// GET    /{id}/open-slots                  -> list_open_slots
/// POST   /{id}/open-slots/regenerate       -> regenerate_open_slots
/// GET    /{id}/bookings                    -> list_bookings
/// POST   /{id}/bookings                    -> create_booking
/// POST   /{id}/quick-book                  -> quick_book
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(trainers::create_trainer))
        .route("/{id}", get(trainers::get_trainer))
        .route(
            "/{id}/availability",
            get(availability::list_windows).post(availability::create_window),
        )
        .route(
            "/{id}/availability/{window_id}",
            put(availability::update_window).delete(availability::delete_window),
        )
        .route(
            "/{id}/breaks",
            get(breaks::list_breaks).post(breaks::create_break),
        )
        .route(
            "/{id}/breaks/{break_id}",
            axum::routing::delete(breaks::delete_break),
        )
        .route(
            "/{id}/holidays",
            get(holidays::list_holidays).post(holidays::create_holiday),
        )
        .route(
            "/{id}/holidays/{holiday_id}",
            axum::routing::delete(holidays::delete_holiday),
        )
        .route(
            "/{id}/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/{id}/slots", get(slots::day_slots))
        .route("/{id}/open-slots", get(open_slots::list_open_slots))
        .route(
            "/{id}/open-slots/regenerate",
            post(open_slots::regenerate_open_slots),
        )
        .route(
            "/{id}/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/{id}/quick-book", post(bookings::quick_book))
}
