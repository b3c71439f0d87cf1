use fitslot_core::types::DbId;
use sqlx::PgPool;

use crate::models::trainer::{CreateTrainer, Trainer};

const COLUMNS: &str = "id, name, timezone, created_at, updated_at";

/// CRUD for the `trainers` table.
pub struct TrainerRepo;

impl TrainerRepo {
    pub async fn create(pool: &PgPool, input: &CreateTrainer) -> Result<Trainer, sqlx::Error> {
        let query = format!(
            "INSERT INTO trainers (name, timezone) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trainer>(&query)
            .bind(&input.name)
            .bind(&input.timezone)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Trainer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trainers WHERE id = $1");
        sqlx::query_as::<_, Trainer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// IDs of every trainer, ascending. Used by the periodic slot refresh.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM trainers ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
