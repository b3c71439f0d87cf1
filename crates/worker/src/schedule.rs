//! Trainer lookups and the per-day slot view.

use std::collections::HashMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use fitslot_core::availability::{MAX_SLOT_MINUTES, MIN_SLOT_MINUTES};
use fitslot_core::booking::bookings_to_busy;
use fitslot_core::error::CoreError;
use fitslot_core::interval::Interval;
use fitslot_core::slots::{build_slots, Slot};
use fitslot_core::timezone::parse_timezone;
use fitslot_core::types::{DbId, Minute};
use fitslot_db::models::booking::Booking;
use fitslot_db::models::trainer::Trainer;
use fitslot_db::ScheduleStore;
use serde::Serialize;

use crate::error::WorkerResult;

/// Fetch a trainer or fail with `NotFound`.
pub async fn require_trainer(store: &dyn ScheduleStore, trainer_id: DbId) -> WorkerResult<Trainer> {
    store
        .find_trainer(trainer_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Trainer",
                id: trainer_id,
            }
            .into()
        })
}

/// The trainer's declared timezone.
pub fn trainer_timezone(trainer: &Trainer) -> WorkerResult<Tz> {
    parse_timezone(&trainer.timezone).map_err(|_| {
        CoreError::Internal(format!(
            "Trainer {} has an invalid timezone '{}'",
            trainer.id, trainer.timezone
        ))
        .into()
    })
}

/// Busy intervals of `bookings`, grouped by booking date.
pub fn busy_by_date(bookings: &[Booking]) -> HashMap<NaiveDate, Vec<Interval>> {
    let mut grouped: HashMap<NaiveDate, Vec<_>> = HashMap::new();
    for booking in bookings {
        grouped.entry(booking.booking_date).or_default().push(booking.span());
    }
    grouped
        .into_iter()
        .map(|(date, spans)| (date, bookings_to_busy(&spans)))
        .collect()
}

/// Busy intervals of one trainer on one date, read fresh from the store.
pub async fn busy_on(
    store: &dyn ScheduleStore,
    trainer_id: DbId,
    date: NaiveDate,
) -> WorkerResult<Vec<Interval>> {
    let bookings = store.list_bookings(trainer_id, date, date).await?;
    let spans: Vec<_> = bookings.iter().map(Booking::span).collect();
    Ok(bookings_to_busy(&spans))
}

// ---------------------------------------------------------------------------
// Day view
// ---------------------------------------------------------------------------

/// Every candidate slot of one date, with availability flags.
#[derive(Debug, Clone, Serialize)]
pub struct DaySlots {
    pub trainer_id: DbId,
    pub date: NaiveDate,
    pub duration_minutes: Minute,
    pub step_minutes: Minute,
    pub is_holiday: bool,
    pub slots: Vec<Slot>,
}

/// Build the quick-book view for `date`.
///
/// `duration` defaults to the trainer's slot length; candidates are spaced
/// `duration + break_minutes` apart.
pub async fn day_slots(
    store: &dyn ScheduleStore,
    trainer_id: DbId,
    date: NaiveDate,
    duration: Option<Minute>,
) -> WorkerResult<DaySlots> {
    require_trainer(store, trainer_id).await?;
    let schedule = store.load_schedule(trainer_id).await?;

    let duration = duration.unwrap_or(schedule.settings.slot_minutes);
    if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&duration) {
        return Err(CoreError::Validation(format!(
            "duration must be between {MIN_SLOT_MINUTES} and {MAX_SLOT_MINUTES}, got {duration}"
        ))
        .into());
    }
    let step = duration + schedule.settings.break_minutes;

    let windows: Vec<Interval> = schedule.day_windows(date).iter().map(|p| p.span).collect();
    let busy = busy_on(store, trainer_id, date).await?;
    let slots = build_slots(&windows, &busy, duration, step);

    Ok(DaySlots {
        trainer_id,
        date,
        duration_minutes: duration,
        step_minutes: step,
        is_holiday: schedule.is_holiday(date),
        slots,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveTime;
    use fitslot_core::availability::ScheduleSettings;
    use fitslot_core::booking::BookingStatus;
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

    /// A Tuesday.
    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 9).unwrap()
    }

    async fn seeded() -> (MemoryStore, DbId) {
        let store = MemoryStore::new();
        let trainer = store
            .create_trainer(&CreateTrainer {
                name: "Maria".into(),
                timezone: "Europe/Athens".into(),
            })
            .await
            .unwrap();
        store
            .create_window(
                trainer.id,
                &NewAvailabilityWindow {
                    weekday: 2,
                    start_time: time(8, 0),
                    end_time: time(10, 0),
                    is_online: false,
                },
            )
            .await
            .unwrap();
        (store, trainer.id)
    }

    #[tokio::test]
    async fn booked_slot_is_flagged_unavailable() {
        let (store, trainer_id) = seeded().await;
        store
            .insert_booking(&NewBooking {
                trainer_id,
                user_id: None,
                booking_date: tuesday(),
                start_time: time(9, 0),
                end_time: time(10, 0),
                duration_min: 60,
                status: BookingStatus::Accepted,
                is_online: false,
                note: None,
            })
            .await
            .unwrap();

        let view = day_slots(&store, trainer_id, tuesday(), None).await.unwrap();
        let flags: Vec<_> = view.slots.iter().map(|s| (s.start, s.available)).collect();
        assert_eq!(flags, vec![(480, true), (540, false)]);
    }

    #[tokio::test]
    async fn duration_override_uses_break_for_step() {
        let (store, trainer_id) = seeded().await;
        store
            .upsert_settings(trainer_id, &ScheduleSettings { slot_minutes: 60, break_minutes: 15 })
            .await
            .unwrap();

        let view = day_slots(&store, trainer_id, tuesday(), Some(30)).await.unwrap();
        assert_eq!(view.step_minutes, 45);
        let starts: Vec<_> = view.slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![480, 525, 570]);
    }

    #[tokio::test]
    async fn holiday_yields_empty_view() {
        let (store, trainer_id) = seeded().await;
        store
            .create_holiday(
                trainer_id,
                &NewHoliday { starts_on: tuesday(), ends_on: tuesday(), reason: None },
            )
            .await
            .unwrap();

        let view = day_slots(&store, trainer_id, tuesday(), None).await.unwrap();
        assert!(view.is_holiday);
        assert!(view.slots.is_empty());
    }

    #[tokio::test]
    async fn unknown_trainer_and_bad_duration_are_rejected() {
        let (store, trainer_id) = seeded().await;
        assert_matches!(
            day_slots(&store, 999, tuesday(), None).await,
            Err(WorkerError::Core(CoreError::NotFound { .. }))
        );
        assert_matches!(
            day_slots(&store, trainer_id, tuesday(), Some(2)).await,
            Err(WorkerError::Core(CoreError::Validation(_)))
        );
    }
}
