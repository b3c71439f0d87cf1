use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fitslot_api::background;
use fitslot_api::config::ServerConfig;
use fitslot_api::router::build_app_router;
use fitslot_api::state::AppState;
use fitslot_db::{PgScheduleStore, ScheduleStore};
use fitslot_events::EventBus;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitslot_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        horizon_days = config.refresh.horizon_days,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = fitslot_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    fitslot_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    fitslot_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn ScheduleStore> = Arc::new(PgScheduleStore::new(pool));

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    // Regenerate open slots whenever a handler publishes a schedule change.
    let listener_cancel = CancellationToken::new();
    let listener_handle = background::spawn_open_slot_listener(&state, listener_cancel.clone());
    tracing::info!("Open slot listener started");

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    listener_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), listener_handle).await;
    drop(event_bus);
    tracing::info!("Open slot listener stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
