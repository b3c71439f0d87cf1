use std::sync::Arc;

use fitslot_db::{PgScheduleStore, ScheduleStore};
use fitslot_worker::config::RefreshConfig;
use fitslot_worker::refresh;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitslot_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RefreshConfig::from_env();
    tracing::info!(
        horizon_days = config.horizon_days,
        interval_secs = config.interval.as_secs(),
        "Loaded refresh configuration"
    );

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = fitslot_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    fitslot_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection pool created");

    let store: Arc<dyn ScheduleStore> = Arc::new(PgScheduleStore::new(pool));
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(refresh::run_periodic(
        store,
        config.interval,
        config.horizon_days,
        cancel.clone(),
    ));

    shutdown_signal().await;

    cancel.cancel();
    let _ = handle.await;
    tracing::info!("Worker stopped");
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
            tracing::info!("Received SIGINT (Ctrl-C), stopping worker");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, stopping worker");
        }
    }
}
