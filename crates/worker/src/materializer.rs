//! Open-slot materialization for one trainer.
//!
//! Plans every open slot of the rolling horizon with
//! [`plan_open_slots`] and replaces the trainer's stored rows for that
//! range. Re-running with unchanged inputs writes nothing.

use chrono::NaiveDate;
use fitslot_core::civil_time::time_of;
use fitslot_core::materialize::{plan_open_slots, Horizon, PlannedSlot};
use fitslot_core::timezone::civil_today;
use fitslot_core::types::{DbId, Timestamp};
use fitslot_db::models::open_slot::NewOpenSlot;
use fitslot_db::ScheduleStore;
use serde::Serialize;

use crate::error::WorkerResult;
use crate::schedule::{busy_by_date, require_trainer, trainer_timezone};

/// Outcome of one regeneration.
#[derive(Debug, Clone, Serialize)]
pub struct MaterializeReport {
    pub trainer_id: DbId,
    /// First date of the horizon (trainer-local today).
    pub from: NaiveDate,
    /// Exclusive end of the horizon.
    pub until: NaiveDate,
    /// Open slots planned for the horizon.
    pub generated: usize,
    /// Rows inserted or changed.
    pub upserted: u64,
    /// Stale rows removed.
    pub deleted: u64,
    /// `true` when the horizon has no open slot at all. Informational.
    pub is_empty: bool,
}

/// Regenerate `trainer_id`'s open slots for `horizon_days` days starting at
/// the trainer's civil date at `now`.
pub async fn materialize(
    store: &dyn ScheduleStore,
    trainer_id: DbId,
    horizon_days: u32,
    now: Timestamp,
) -> WorkerResult<MaterializeReport> {
    let trainer = require_trainer(store, trainer_id).await?;
    let tz = trainer_timezone(&trainer)?;
    let horizon = Horizon::starting(civil_today(tz, now), horizon_days)?;

    let schedule = store.load_schedule(trainer_id).await?;
    let bookings = store
        .list_bookings(trainer_id, horizon.from, horizon.last_day())
        .await?;
    let busy = busy_by_date(&bookings);

    let planned = plan_open_slots(&schedule, &horizon, &busy);
    let rows: Vec<NewOpenSlot> = planned
        .iter()
        .filter_map(|slot| to_row(trainer_id, slot))
        .collect();

    let outcome = store
        .replace_open_slots(trainer_id, horizon.from, horizon.until, &rows)
        .await?;

    let report = MaterializeReport {
        trainer_id,
        from: horizon.from,
        until: horizon.until,
        generated: rows.len(),
        upserted: outcome.upserted,
        deleted: outcome.deleted,
        is_empty: rows.is_empty(),
    };

    if report.is_empty {
        tracing::info!(trainer_id, from = %report.from, "No open slots in horizon");
    } else {
        tracing::debug!(
            trainer_id,
            generated = report.generated,
            upserted = report.upserted,
            deleted = report.deleted,
            "Open slots materialized",
        );
    }
    Ok(report)
}

fn to_row(trainer_id: DbId, slot: &PlannedSlot) -> Option<NewOpenSlot> {
    let (Some(start_time), Some(end_time)) = (time_of(slot.start), time_of(slot.end)) else {
        // A TIME column cannot hold 24:00.
        tracing::warn!(trainer_id, date = %slot.date, start = slot.start, "Skipping slot ending at midnight");
        return None;
    };
    Some(NewOpenSlot {
        trainer_id,
        slot_date: slot.date,
        start_time,
        end_time,
        is_online: slot.is_online,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{NaiveTime, TimeZone, Utc};
    use fitslot_core::booking::BookingStatus;
    use fitslot_core::error::CoreError;
    use fitslot_db::models::availability::NewAvailabilityWindow;
    use fitslot_db::models::booking::NewBooking;
    use fitslot_db::models::holiday::NewHoliday;
    use fitslot_db::models::trainer::CreateTrainer;
    use fitslot_db::MemoryStore;

    use super::*;
    use crate::error::WorkerError;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 2024-07-09 06:00 UTC, 09:00 in Athens.
    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 7, 9, 6, 0, 0).unwrap()
    }

    /// Trainer with an 08:00-10:00 window every day of the week.
    async fn seeded() -> (MemoryStore, DbId) {
        let store = MemoryStore::new();
        let trainer = store
            .create_trainer(&CreateTrainer {
                name: "Kostas".into(),
                timezone: "Europe/Athens".into(),
            })
            .await
            .unwrap();
        for weekday in 0..7 {
            store
                .create_window(
                    trainer.id,
                    &NewAvailabilityWindow {
                        weekday,
                        start_time: time(8, 0),
                        end_time: time(10, 0),
                        is_online: false,
                    },
                )
                .await
                .unwrap();
        }
        (store, trainer.id)
    }

    // -- regeneration ---------------------------------------------------------

    #[tokio::test]
    async fn second_run_writes_nothing() {
        let (store, trainer_id) = seeded().await;

        let first = materialize(&store, trainer_id, 7, now()).await.unwrap();
        assert_eq!(first.generated, 14);
        assert_eq!(first.upserted, 14);
        assert_eq!(first.from, date(2024, 7, 9));
        assert_eq!(first.until, date(2024, 7, 16));

        let second = materialize(&store, trainer_id, 7, now()).await.unwrap();
        assert_eq!(second.generated, 14);
        assert_eq!(second.upserted, 0);
        assert_eq!(second.deleted, 0);
    }

    #[tokio::test]
    async fn holidays_skip_days() {
        let (store, trainer_id) = seeded().await;
        store
            .create_holiday(
                trainer_id,
                &NewHoliday {
                    starts_on: date(2024, 7, 10),
                    ends_on: date(2024, 7, 12),
                    reason: Some("Summer break".into()),
                },
            )
            .await
            .unwrap();

        materialize(&store, trainer_id, 7, now()).await.unwrap();

        let rows = store
            .list_open_slots(trainer_id, date(2024, 7, 9), date(2024, 7, 15))
            .await
            .unwrap();
        let on = |d: NaiveDate| rows.iter().filter(|r| r.slot_date == d).count();
        assert_eq!(on(date(2024, 7, 9)), 2);
        assert_eq!(on(date(2024, 7, 10)), 0);
        assert_eq!(on(date(2024, 7, 11)), 0);
        assert_eq!(on(date(2024, 7, 12)), 0);
        assert_eq!(on(date(2024, 7, 13)), 2);
    }

    #[tokio::test]
    async fn new_booking_prunes_its_open_slot() {
        let (store, trainer_id) = seeded().await;
        materialize(&store, trainer_id, 3, now()).await.unwrap();

        store
            .insert_booking(&NewBooking {
                trainer_id,
                user_id: Some(4),
                booking_date: date(2024, 7, 10),
                start_time: time(9, 0),
                end_time: time(10, 0),
                duration_min: 60,
                status: BookingStatus::Pending,
                is_online: false,
                note: None,
            })
            .await
            .unwrap();

        let report = materialize(&store, trainer_id, 3, now()).await.unwrap();
        assert_eq!(report.generated, 5);
        assert_eq!(report.deleted, 1);

        let rows = store
            .list_open_slots(trainer_id, date(2024, 7, 10), date(2024, 7, 10))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].start_time, time(8, 0));
    }

    #[tokio::test]
    async fn horizon_starts_at_trainer_local_today() {
        let (store, trainer_id) = seeded().await;
        // 22:30 UTC on the 9th is already the 10th in Athens.
        let late = Utc.with_ymd_and_hms(2024, 7, 9, 22, 30, 0).unwrap();

        let report = materialize(&store, trainer_id, 1, late).await.unwrap();
        assert_eq!(report.from, date(2024, 7, 10));
    }

    // -- edge cases -----------------------------------------------------------

    #[tokio::test]
    async fn empty_schedule_is_reported_not_failed() {
        let store = MemoryStore::new();
        let trainer = store
            .create_trainer(&CreateTrainer {
                name: "Idle".into(),
                timezone: "Europe/Athens".into(),
            })
            .await
            .unwrap();

        let report = materialize(&store, trainer.id, 30, now()).await.unwrap();
        assert!(report.is_empty);
        assert_eq!(report.generated, 0);
    }

    #[tokio::test]
    async fn invalid_horizon_and_missing_trainer_fail() {
        let (store, trainer_id) = seeded().await;
        assert_matches!(
            materialize(&store, trainer_id, 0, now()).await,
            Err(WorkerError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            materialize(&store, 404, 7, now()).await,
            Err(WorkerError::Core(CoreError::NotFound { .. }))
        );
    }
}
