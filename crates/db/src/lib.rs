//! PostgreSQL persistence for trainer schedules, bookings and open slots.
//!
//! Repositories in [`repositories`] talk to the database directly. The rest
//! of the workspace goes through the [`ScheduleStore`] trait, implemented by
//! [`PgScheduleStore`]. The in-process `MemoryStore` is compiled only for
//! tests and the `test-support` feature.

use sqlx::postgres::PgPoolOptions;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;
pub use store::{PgScheduleStore, ScheduleStore, StoreError, StoreResult};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
