use fitslot_core::availability::ScheduleSettings as CoreSettings;
use fitslot_core::types::DbId;
use sqlx::PgPool;

use crate::models::schedule_settings::ScheduleSettings;

const COLUMNS: &str = "trainer_id, slot_minutes, break_minutes, updated_at";

/// Access to the one-row-per-trainer `schedule_settings` table.
pub struct ScheduleSettingsRepo;

impl ScheduleSettingsRepo {
    pub async fn find_by_trainer(
        pool: &PgPool,
        trainer_id: DbId,
    ) -> Result<Option<ScheduleSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM schedule_settings WHERE trainer_id = $1");
        sqlx::query_as::<_, ScheduleSettings>(&query)
            .bind(trainer_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace a trainer's settings.
    pub async fn upsert(
        pool: &PgPool,
        trainer_id: DbId,
        input: &CoreSettings,
    ) -> Result<ScheduleSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedule_settings (trainer_id, slot_minutes, break_minutes) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (trainer_id) \
             DO UPDATE SET slot_minutes = EXCLUDED.slot_minutes, \
                           break_minutes = EXCLUDED.break_minutes, \
                           updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleSettings>(&query)
            .bind(trainer_id)
            .bind(input.slot_minutes as i32)
            .bind(input.break_minutes as i32)
            .fetch_one(pool)
            .await
    }
}
