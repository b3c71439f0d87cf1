use fitslot_core::types::DbId;
use sqlx::PgPool;

use crate::models::schedule_break::{NewScheduleBreak, ScheduleBreak};

const COLUMNS: &str = "id, trainer_id, weekday, start_time, end_time, created_at";

/// CRUD for the `schedule_breaks` table.
pub struct ScheduleBreakRepo;

impl ScheduleBreakRepo {
    pub async fn list_by_trainer(
        pool: &PgPool,
        trainer_id: DbId,
    ) -> Result<Vec<ScheduleBreak>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedule_breaks \
             WHERE trainer_id = $1 \
             ORDER BY weekday NULLS FIRST, start_time, id"
        );
        sqlx::query_as::<_, ScheduleBreak>(&query)
            .bind(trainer_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        trainer_id: DbId,
        input: &NewScheduleBreak,
    ) -> Result<ScheduleBreak, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedule_breaks (trainer_id, weekday, start_time, end_time) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleBreak>(&query)
            .bind(trainer_id)
            .bind(input.weekday)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, trainer_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedule_breaks WHERE id = $1 AND trainer_id = $2")
            .bind(id)
            .bind(trainer_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
