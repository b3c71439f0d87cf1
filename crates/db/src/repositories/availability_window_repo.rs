use fitslot_core::types::DbId;
use sqlx::PgPool;

use crate::models::availability::{AvailabilityWindow, NewAvailabilityWindow};

const COLUMNS: &str = "\
    id, trainer_id, weekday, start_time, end_time, is_online, created_at, updated_at";

/// CRUD for the `availability_windows` table.
pub struct AvailabilityWindowRepo;

impl AvailabilityWindowRepo {
    /// List a trainer's windows ordered by weekday then start time.
    pub async fn list_by_trainer(
        pool: &PgPool,
        trainer_id: DbId,
    ) -> Result<Vec<AvailabilityWindow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM availability_windows \
             WHERE trainer_id = $1 \
             ORDER BY weekday, start_time, id"
        );
        sqlx::query_as::<_, AvailabilityWindow>(&query)
            .bind(trainer_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        trainer_id: DbId,
        input: &NewAvailabilityWindow,
    ) -> Result<AvailabilityWindow, sqlx::Error> {
        let query = format!(
            "INSERT INTO availability_windows (trainer_id, weekday, start_time, end_time, is_online) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AvailabilityWindow>(&query)
            .bind(trainer_id)
            .bind(input.weekday)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.is_online)
            .fetch_one(pool)
            .await
    }

    /// Replace a window's fields. Returns `None` if the window does not
    /// belong to `trainer_id`.
    pub async fn update(
        pool: &PgPool,
        trainer_id: DbId,
        id: DbId,
        input: &NewAvailabilityWindow,
    ) -> Result<Option<AvailabilityWindow>, sqlx::Error> {
        let query = format!(
            "UPDATE availability_windows \
             SET weekday = $3, start_time = $4, end_time = $5, is_online = $6, updated_at = now() \
             WHERE id = $1 AND trainer_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AvailabilityWindow>(&query)
            .bind(id)
            .bind(trainer_id)
            .bind(input.weekday)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.is_online)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, trainer_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM availability_windows WHERE id = $1 AND trainer_id = $2")
                .bind(id)
                .bind(trainer_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
