#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use fitslot_api::config::ServerConfig;
use fitslot_api::router::build_app_router;
use fitslot_api::state::AppState;
use fitslot_db::PgScheduleStore;
use fitslot_events::EventBus;
use fitslot_worker::config::RefreshConfig;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// A Monday far enough ahead that bookings on it never count as past.
pub const MONDAY: &str = "2099-03-02";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        default_timezone: "Europe/Athens".to_string(),
        refresh: RefreshConfig::default(),
    }
}

/// Everything a test needs to drive the app and inspect its side effects.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub event_bus: Arc<EventBus>,
}

/// Build the full application router over the given database pool, with the
/// same middleware stack as production.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());

    let state = AppState {
        store: Arc::new(PgScheduleStore::new(pool.clone())),
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    TestApp {
        router: build_app_router(state, &config),
        pool,
        event_bus,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a trainer and return its id.
pub async fn create_trainer(app: &Router) -> i64 {
    let body = expect(
        post_json(app, "/api/v1/trainers", serde_json::json!({ "name": "Eleni" })).await,
        StatusCode::CREATED,
    )
    .await;
    body["data"]["id"].as_i64().unwrap()
}

/// Add a window on `weekday` (`0 = Sunday`).
pub async fn add_window(app: &Router, trainer_id: i64, weekday: i16, start: &str, end: &str) {
    let response = post_json(
        app,
        &format!("/api/v1/trainers/{trainer_id}/availability"),
        serde_json::json!({ "weekday": weekday, "start": start, "end": end }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
