//! Keeps materialized open slots current.
//!
//! Two long-running tasks, both stopped by a [`CancellationToken`]:
//!
//! - [`listen`] regenerates a trainer whenever a [`ScheduleEvent`] names
//!   them. Events already queued are drained first so a burst of edits to
//!   one trainer triggers a single regeneration.
//! - [`run_periodic`] regenerates every trainer on a fixed interval so the
//!   rolling horizon advances even without edits.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fitslot_core::types::{DbId, Timestamp};
use fitslot_db::ScheduleStore;
use fitslot_events::ScheduleEvent;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_util::sync::CancellationToken;

use crate::error::WorkerResult;
use crate::materializer::materialize;

/// Totals of a multi-trainer refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub trainers: usize,
    pub failed: usize,
    pub upserted: u64,
    pub deleted: u64,
}

/// Regenerate each trainer in `trainer_ids`. Failures are logged and
/// counted; they do not stop the remaining trainers.
pub async fn refresh_trainers(
    store: &dyn ScheduleStore,
    trainer_ids: impl IntoIterator<Item = DbId>,
    horizon_days: u32,
    now: Timestamp,
) -> RefreshSummary {
    let mut summary = RefreshSummary::default();
    for trainer_id in trainer_ids {
        summary.trainers += 1;
        match materialize(store, trainer_id, horizon_days, now).await {
            Ok(report) => {
                summary.upserted += report.upserted;
                summary.deleted += report.deleted;
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!(trainer_id, error = %e, "Open slot refresh failed");
            }
        }
    }
    summary
}

/// Regenerate every trainer in the store.
pub async fn refresh_all(
    store: &dyn ScheduleStore,
    horizon_days: u32,
    now: Timestamp,
) -> WorkerResult<RefreshSummary> {
    let trainer_ids = store.list_trainer_ids().await?;
    Ok(refresh_trainers(store, trainer_ids, horizon_days, now).await)
}

/// Drain whatever is already queued behind `first`.
///
/// Returns the affected trainers and whether the receiver lagged (events
/// were lost, so every trainer must be refreshed).
fn coalesce(
    first: ScheduleEvent,
    rx: &mut broadcast::Receiver<ScheduleEvent>,
) -> (BTreeSet<DbId>, bool) {
    let mut trainers = BTreeSet::from([first.trainer_id]);
    let mut lagged = false;
    loop {
        match rx.try_recv() {
            Ok(event) => {
                trainers.insert(event.trainer_id);
            }
            Err(TryRecvError::Lagged(_)) => lagged = true,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    (trainers, lagged)
}

/// Regenerate trainers named by events on `rx` until cancelled or the bus
/// is dropped.
pub async fn listen(
    store: Arc<dyn ScheduleStore>,
    mut rx: broadcast::Receiver<ScheduleEvent>,
    horizon_days: u32,
    cancel: CancellationToken,
) {
    tracing::info!(horizon_days, "Open slot listener started");

    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => received,
        };

        match received {
            Ok(event) => {
                let (trainers, lagged) = coalesce(event, &mut rx);
                if lagged {
                    resync(store.as_ref(), horizon_days).await;
                } else {
                    tracing::debug!(count = trainers.len(), "Refreshing open slots after change");
                    refresh_trainers(store.as_ref(), trainers, horizon_days, Utc::now()).await;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Open slot listener lagged, refreshing all trainers");
                resync(store.as_ref(), horizon_days).await;
            }
            Err(RecvError::Closed) => break,
        }
    }

    tracing::info!("Open slot listener stopping");
}

async fn resync(store: &dyn ScheduleStore, horizon_days: u32) {
    if let Err(e) = refresh_all(store, horizon_days, Utc::now()).await {
        tracing::error!(error = %e, "Open slot resync failed");
    }
}

/// Regenerate every trainer each `period` until cancelled. The first pass
/// runs immediately.
pub async fn run_periodic(
    store: Arc<dyn ScheduleStore>,
    period: Duration,
    horizon_days: u32,
    cancel: CancellationToken,
) {
    tracing::info!(
        horizon_days,
        interval_secs = period.as_secs(),
        "Periodic open slot refresh started"
    );

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Periodic open slot refresh stopping");
                break;
            }
            _ = interval.tick() => {
                match refresh_all(store.as_ref(), horizon_days, Utc::now()).await {
                    Ok(summary) if summary.failed > 0 => {
                        tracing::warn!(
                            trainers = summary.trainers,
                            failed = summary.failed,
                            "Open slot refresh finished with failures"
                        );
                    }
                    Ok(summary) => {
                        tracing::info!(
                            trainers = summary.trainers,
                            upserted = summary.upserted,
                            deleted = summary.deleted,
                            "Open slot refresh finished"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Open slot refresh: listing trainers failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use fitslot_db::models::availability::NewAvailabilityWindow;
    use fitslot_db::models::trainer::CreateTrainer;
    use fitslot_db::MemoryStore;
    use fitslot_events::bus::{AVAILABILITY_CHANGED, HOLIDAYS_CHANGED};
    use fitslot_events::EventBus;

    use super::*;

    async fn trainer_with_window(store: &MemoryStore, name: &str) -> DbId {
        let trainer = store
            .create_trainer(&CreateTrainer {
                name: name.into(),
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
                        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                        end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                        is_online: true,
                    },
                )
                .await
                .unwrap();
        }
        trainer.id
    }

    #[test]
    fn queued_events_are_coalesced_per_trainer() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        for trainer_id in [1, 2, 1, 1, 3] {
            bus.publish(ScheduleEvent::new(AVAILABILITY_CHANGED, trainer_id));
        }

        let first = rx.try_recv().unwrap();
        let (trainers, lagged) = coalesce(first, &mut rx);
        assert_eq!(trainers.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!lagged);
    }

    #[tokio::test]
    async fn refresh_all_counts_failures_without_stopping() {
        let store = MemoryStore::new();
        let a = trainer_with_window(&store, "A").await;
        trainer_with_window(&store, "B").await;
        let now = Utc.with_ymd_and_hms(2024, 7, 9, 6, 0, 0).unwrap();

        let summary = refresh_all(&store, 2, now).await.unwrap();
        assert_eq!(summary, RefreshSummary { trainers: 2, failed: 0, upserted: 4, deleted: 0 });

        let partial = refresh_trainers(&store, [a, 999], 2, now).await;
        assert_eq!(partial.trainers, 2);
        assert_eq!(partial.failed, 1);
    }

    #[tokio::test]
    async fn listener_regenerates_after_event_and_stops_on_cancel() {
        let store = Arc::new(MemoryStore::new());
        let trainer_id = trainer_with_window(&store, "C").await;
        let bus = EventBus::default();
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(listen(
            store.clone(),
            bus.subscribe(),
            3,
            cancel.clone(),
        ));

        bus.publish(ScheduleEvent::new(HOLIDAYS_CHANGED, trainer_id));

        let today = fitslot_core::timezone::civil_today(
            fitslot_core::timezone::parse_timezone("Europe/Athens").unwrap(),
            Utc::now(),
        );
        let until = today + chrono::Days::new(2);
        let mut rows = Vec::new();
        for _ in 0..100 {
            rows = store.list_open_slots(trainer_id, today, until).await.unwrap();
            if !rows.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(rows.len(), 3);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn periodic_refresh_runs_immediately() {
        let store = Arc::new(MemoryStore::new());
        let trainer_id = trainer_with_window(&store, "D").await;
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run_periodic(
            store.clone(),
            Duration::from_secs(3600),
            1,
            cancel.clone(),
        ));

        let mut found = false;
        for _ in 0..100 {
            let far = NaiveDate::from_ymd_opt(2100, 1, 1).unwrap();
            let min = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            if !store.list_open_slots(trainer_id, min, far).await.unwrap().is_empty() {
                found = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(found);

        cancel.cancel();
        handle.await.unwrap();
    }
}
