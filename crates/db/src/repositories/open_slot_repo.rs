//! Repository for the derived `open_slots` table.

use chrono::{NaiveDate, NaiveTime};
use fitslot_core::materialize::upsert_batches;
use fitslot_core::types::DbId;
use sqlx::PgPool;

use crate::models::open_slot::{NewOpenSlot, OpenSlot, ReplaceOutcome, OPEN_SLOT_STATUS};

const COLUMNS: &str = "\
    id, trainer_id, slot_date, start_time, end_time, is_online, status, generated_at";

/// Bulk regeneration and browsing of materialized open slots.
pub struct OpenSlotRepo;

impl OpenSlotRepo {
    /// List a trainer's open slots with `from <= slot_date <= to`.
    pub async fn list_by_trainer_range(
        pool: &PgPool,
        trainer_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<OpenSlot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM open_slots \
             WHERE trainer_id = $1 AND slot_date BETWEEN $2 AND $3 \
             ORDER BY slot_date, start_time"
        );
        sqlx::query_as::<_, OpenSlot>(&query)
            .bind(trainer_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Make `[from, until)` hold exactly `rows` for `trainer_id`.
    ///
    /// Rows are upserted on `(trainer_id, slot_date, start_time)` in bounded
    /// batches; rows whose values are unchanged are left untouched. Rows in
    /// the range that are not part of `rows` are then deleted. Runs in one
    /// transaction.
    pub async fn replace_range(
        pool: &PgPool,
        trainer_id: DbId,
        from: NaiveDate,
        until: NaiveDate,
        rows: &[NewOpenSlot],
    ) -> Result<ReplaceOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut outcome = ReplaceOutcome::default();

        let upsert = "\
            INSERT INTO open_slots \
                (trainer_id, slot_date, start_time, end_time, is_online, status) \
            SELECT * FROM UNNEST($1::bigint[], $2::date[], $3::time[], $4::time[], $5::bool[], $6::text[]) \
            ON CONFLICT (trainer_id, slot_date, start_time) \
            DO UPDATE SET end_time = EXCLUDED.end_time, \
                          is_online = EXCLUDED.is_online, \
                          status = EXCLUDED.status, \
                          generated_at = now() \
            WHERE (open_slots.end_time, open_slots.is_online, open_slots.status) \
                  IS DISTINCT FROM (EXCLUDED.end_time, EXCLUDED.is_online, EXCLUDED.status)";

        for batch in upsert_batches(rows) {
            let trainer_ids: Vec<DbId> = batch.iter().map(|r| r.trainer_id).collect();
            let dates: Vec<NaiveDate> = batch.iter().map(|r| r.slot_date).collect();
            let starts: Vec<NaiveTime> = batch.iter().map(|r| r.start_time).collect();
            let ends: Vec<NaiveTime> = batch.iter().map(|r| r.end_time).collect();
            let online: Vec<bool> = batch.iter().map(|r| r.is_online).collect();
            let statuses: Vec<String> = vec![OPEN_SLOT_STATUS.to_string(); batch.len()];

            let result = sqlx::query(upsert)
                .bind(&trainer_ids)
                .bind(&dates)
                .bind(&starts)
                .bind(&ends)
                .bind(&online)
                .bind(&statuses)
                .execute(&mut *tx)
                .await?;
            outcome.upserted += result.rows_affected();
        }

        let keep_dates: Vec<NaiveDate> = rows.iter().map(|r| r.slot_date).collect();
        let keep_starts: Vec<NaiveTime> = rows.iter().map(|r| r.start_time).collect();
        let result = sqlx::query(
            "DELETE FROM open_slots \
             WHERE trainer_id = $1 AND slot_date >= $2 AND slot_date < $3 \
               AND (slot_date, start_time) NOT IN \
                   (SELECT d, t FROM UNNEST($4::date[], $5::time[]) AS keep(d, t))",
        )
        .bind(trainer_id)
        .bind(from)
        .bind(until)
        .bind(&keep_dates)
        .bind(&keep_starts)
        .execute(&mut *tx)
        .await?;
        outcome.deleted = result.rows_affected();

        tx.commit().await?;

        tracing::debug!(
            trainer_id,
            upserted = outcome.upserted,
            deleted = outcome.deleted,
            "Open slots replaced",
        );
        Ok(outcome)
    }
}
