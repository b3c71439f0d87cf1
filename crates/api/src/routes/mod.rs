pub mod bookings;
pub mod health;
pub mod trainers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /trainers                                        create
/// /trainers/{id}                                   get
/// /trainers/{id}/availability                      list, add window
/// /trainers/{id}/availability/{window_id}          replace, delete
/// /trainers/{id}/breaks                            list, add
/// /trainers/{id}/breaks/{break_id}                 delete
/// /trainers/{id}/holidays                          list, add
/// /trainers/{id}/holidays/{holiday_id}             delete
/// /trainers/{id}/settings                          get, replace
/// /trainers/{id}/slots                             day slot view (?date=&duration=)
/// /trainers/{id}/open-slots                        materialized rows (?from=&to=)
/// /trainers/{id}/open-slots/regenerate             regenerate (POST, ?horizon_days=)
/// /trainers/{id}/bookings                          list (?from=&to=), client booking
/// /trainers/{id}/quick-book                        trainer booking (POST)
///
/// /bookings/{id}                                   get
/// /bookings/{id}/status                            accept, decline, cancel (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/trainers", trainers::router())
        .nest("/bookings", bookings::router())
}
