use fitslot_core::types::DbId;
use sqlx::PgPool;

use crate::models::holiday::{Holiday, NewHoliday};

const COLUMNS: &str = "id, trainer_id, starts_on, ends_on, reason, created_at";

/// CRUD for the `holidays` table.
pub struct HolidayRepo;

impl HolidayRepo {
    pub async fn list_by_trainer(
        pool: &PgPool,
        trainer_id: DbId,
    ) -> Result<Vec<Holiday>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM holidays \
             WHERE trainer_id = $1 \
             ORDER BY starts_on, id"
        );
        sqlx::query_as::<_, Holiday>(&query)
            .bind(trainer_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        trainer_id: DbId,
        input: &NewHoliday,
    ) -> Result<Holiday, sqlx::Error> {
        let query = format!(
            "INSERT INTO holidays (trainer_id, starts_on, ends_on, reason) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Holiday>(&query)
            .bind(trainer_id)
            .bind(input.starts_on)
            .bind(input.ends_on)
            .bind(&input.reason)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, trainer_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = $1 AND trainer_id = $2")
            .bind(id)
            .bind(trainer_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
