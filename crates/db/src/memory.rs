//! In-process [`ScheduleStore`] for unit tests of the worker and this crate.
//!
//! Mirrors the constraints of the PostgreSQL schema that the availability
//! core relies on: trainer foreign keys, the booking exclusion constraint and
//! the `(trainer_id, slot_date, start_time)` open-slot key.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use fitslot_core::availability::ScheduleSettings as CoreSettings;
use fitslot_core::booking::{releases_time, BookingStatus};
use fitslot_core::types::DbId;

use crate::models::availability::{AvailabilityWindow, NewAvailabilityWindow};
use crate::models::booking::{Booking, NewBooking};
use crate::models::holiday::{Holiday, NewHoliday};
use crate::models::open_slot::{NewOpenSlot, OpenSlot, ReplaceOutcome, OPEN_SLOT_STATUS};
use crate::models::schedule_break::{NewScheduleBreak, ScheduleBreak};
use crate::models::schedule_settings::ScheduleSettings;
use crate::models::trainer::{CreateTrainer, Trainer};
use crate::store::{ScheduleStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    trainers: BTreeMap<DbId, Trainer>,
    windows: BTreeMap<DbId, AvailabilityWindow>,
    breaks: BTreeMap<DbId, ScheduleBreak>,
    holidays: BTreeMap<DbId, Holiday>,
    settings: BTreeMap<DbId, ScheduleSettings>,
    bookings: BTreeMap<DbId, Booking>,
    open_slots: BTreeMap<(DbId, NaiveDate, NaiveTime), OpenSlot>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn require_trainer(&self, trainer_id: DbId, constraint: &str) -> StoreResult<()> {
        if self.trainers.contains_key(&trainer_id) {
            Ok(())
        } else {
            Err(StoreError::Rejected {
                constraint: constraint.to_string(),
            })
        }
    }
}

/// A [`ScheduleStore`] holding all rows in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        Ok(self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

fn booking_end(booking: &Booking) -> Option<u32> {
    booking.span().end_minute()
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.tables().map(|_| ())
    }

    async fn create_trainer(&self, input: &CreateTrainer) -> StoreResult<Trainer> {
        let mut t = self.tables()?;
        let now = Utc::now();
        let trainer = Trainer {
            id: t.next_id(),
            name: input.name.clone(),
            timezone: input.timezone.clone(),
            created_at: now,
            updated_at: now,
        };
        t.trainers.insert(trainer.id, trainer.clone());
        Ok(trainer)
    }

    async fn find_trainer(&self, id: DbId) -> StoreResult<Option<Trainer>> {
        Ok(self.tables()?.trainers.get(&id).cloned())
    }

    async fn list_trainer_ids(&self) -> StoreResult<Vec<DbId>> {
        Ok(self.tables()?.trainers.keys().copied().collect())
    }

    async fn list_windows(&self, trainer_id: DbId) -> StoreResult<Vec<AvailabilityWindow>> {
        let t = self.tables()?;
        let mut rows: Vec<_> = t
            .windows
            .values()
            .filter(|w| w.trainer_id == trainer_id)
            .cloned()
            .collect();
        rows.sort_by_key(|w| (w.weekday, w.start_time, w.id));
        Ok(rows)
    }

    async fn create_window(
        &self,
        trainer_id: DbId,
        input: &NewAvailabilityWindow,
    ) -> StoreResult<AvailabilityWindow> {
        let mut t = self.tables()?;
        t.require_trainer(trainer_id, "availability_windows_trainer_id_fkey")?;
        let now = Utc::now();
        let window = AvailabilityWindow {
            id: t.next_id(),
            trainer_id,
            weekday: input.weekday,
            start_time: input.start_time,
            end_time: input.end_time,
            is_online: input.is_online,
            created_at: now,
            updated_at: now,
        };
        t.windows.insert(window.id, window.clone());
        Ok(window)
    }

    async fn update_window(
        &self,
        trainer_id: DbId,
        window_id: DbId,
        input: &NewAvailabilityWindow,
    ) -> StoreResult<Option<AvailabilityWindow>> {
        let mut t = self.tables()?;
        let Some(window) = t
            .windows
            .get_mut(&window_id)
            .filter(|w| w.trainer_id == trainer_id)
        else {
            return Ok(None);
        };
        window.weekday = input.weekday;
        window.start_time = input.start_time;
        window.end_time = input.end_time;
        window.is_online = input.is_online;
        window.updated_at = Utc::now();
        Ok(Some(window.clone()))
    }

    async fn delete_window(&self, trainer_id: DbId, window_id: DbId) -> StoreResult<bool> {
        let mut t = self.tables()?;
        let owned = t.windows.get(&window_id).is_some_and(|w| w.trainer_id == trainer_id);
        Ok(owned && t.windows.remove(&window_id).is_some())
    }

    async fn list_breaks(&self, trainer_id: DbId) -> StoreResult<Vec<ScheduleBreak>> {
        let t = self.tables()?;
        let mut rows: Vec<_> = t
            .breaks
            .values()
            .filter(|b| b.trainer_id == trainer_id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.weekday, b.start_time, b.id));
        Ok(rows)
    }

    async fn create_break(
        &self,
        trainer_id: DbId,
        input: &NewScheduleBreak,
    ) -> StoreResult<ScheduleBreak> {
        let mut t = self.tables()?;
        t.require_trainer(trainer_id, "schedule_breaks_trainer_id_fkey")?;
        let row = ScheduleBreak {
            id: t.next_id(),
            trainer_id,
            weekday: input.weekday,
            start_time: input.start_time,
            end_time: input.end_time,
            created_at: Utc::now(),
        };
        t.breaks.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_break(&self, trainer_id: DbId, break_id: DbId) -> StoreResult<bool> {
        let mut t = self.tables()?;
        let owned = t.breaks.get(&break_id).is_some_and(|b| b.trainer_id == trainer_id);
        Ok(owned && t.breaks.remove(&break_id).is_some())
    }

    async fn list_holidays(&self, trainer_id: DbId) -> StoreResult<Vec<Holiday>> {
        let t = self.tables()?;
        let mut rows: Vec<_> = t
            .holidays
            .values()
            .filter(|h| h.trainer_id == trainer_id)
            .cloned()
            .collect();
        rows.sort_by_key(|h| (h.starts_on, h.id));
        Ok(rows)
    }

    async fn create_holiday(&self, trainer_id: DbId, input: &NewHoliday) -> StoreResult<Holiday> {
        let mut t = self.tables()?;
        t.require_trainer(trainer_id, "holidays_trainer_id_fkey")?;
        let row = Holiday {
            id: t.next_id(),
            trainer_id,
            starts_on: input.starts_on,
            ends_on: input.ends_on,
            reason: input.reason.clone(),
            created_at: Utc::now(),
        };
        t.holidays.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_holiday(&self, trainer_id: DbId, holiday_id: DbId) -> StoreResult<bool> {
        let mut t = self.tables()?;
        let owned = t.holidays.get(&holiday_id).is_some_and(|h| h.trainer_id == trainer_id);
        Ok(owned && t.holidays.remove(&holiday_id).is_some())
    }

    async fn find_settings(&self, trainer_id: DbId) -> StoreResult<Option<ScheduleSettings>> {
        Ok(self.tables()?.settings.get(&trainer_id).cloned())
    }

    async fn upsert_settings(
        &self,
        trainer_id: DbId,
        input: &CoreSettings,
    ) -> StoreResult<ScheduleSettings> {
        let mut t = self.tables()?;
        t.require_trainer(trainer_id, "schedule_settings_trainer_id_fkey")?;
        let row = ScheduleSettings {
            trainer_id,
            slot_minutes: input.slot_minutes as i32,
            break_minutes: input.break_minutes as i32,
            updated_at: Utc::now(),
        };
        t.settings.insert(trainer_id, row.clone());
        Ok(row)
    }

    async fn list_bookings(
        &self,
        trainer_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Booking>> {
        let t = self.tables()?;
        let mut rows: Vec<_> = t
            .bookings
            .values()
            .filter(|b| b.trainer_id == trainer_id && from <= b.booking_date && b.booking_date <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.booking_date, b.start_time, b.id));
        Ok(rows)
    }

    async fn find_booking(&self, id: DbId) -> StoreResult<Option<Booking>> {
        Ok(self.tables()?.bookings.get(&id).cloned())
    }

    async fn insert_booking(&self, input: &NewBooking) -> StoreResult<Booking> {
        let mut t = self.tables()?;
        t.require_trainer(input.trainer_id, "bookings_trainer_id_fkey")?;

        let now = Utc::now();
        let booking = Booking {
            id: t.next_id(),
            trainer_id: input.trainer_id,
            user_id: input.user_id,
            booking_date: input.booking_date,
            start_time: input.start_time,
            end_time: Some(input.end_time),
            duration_min: Some(input.duration_min),
            status: input.status.as_str().to_string(),
            is_online: input.is_online,
            note: input.note.clone(),
            created_at: now,
            updated_at: now,
        };

        if input.status.occupies_time() {
            let proposed = booking.span().interval();
            let clash = t.bookings.values().any(|existing| {
                existing.trainer_id == booking.trainer_id
                    && existing.booking_date == booking.booking_date
                    && !releases_time(&existing.status)
                    && existing.span().interval().zip(proposed).is_some_and(|(a, b)| a.overlaps(&b))
            });
            if clash {
                return Err(StoreError::Conflict {
                    constraint: "ex_bookings_no_overlap".into(),
                });
            }
        }

        t.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update_booking_status(
        &self,
        id: DbId,
        status: BookingStatus,
    ) -> StoreResult<Option<Booking>> {
        let mut t = self.tables()?;
        let Some(booking) = t.bookings.get_mut(&id) else {
            return Ok(None);
        };
        booking.status = status.as_str().to_string();
        booking.updated_at = Utc::now();
        Ok(Some(booking.clone()))
    }

    async fn replace_open_slots(
        &self,
        trainer_id: DbId,
        from: NaiveDate,
        until: NaiveDate,
        rows: &[NewOpenSlot],
    ) -> StoreResult<ReplaceOutcome> {
        let mut t = self.tables()?;
        t.require_trainer(trainer_id, "open_slots_trainer_id_fkey")?;
        let mut outcome = ReplaceOutcome::default();
        let now = Utc::now();

        for row in rows {
            let key = (row.trainer_id, row.slot_date, row.start_time);
            if let Some(existing) = t.open_slots.get_mut(&key) {
                let unchanged = existing.end_time == row.end_time
                    && existing.is_online == row.is_online
                    && existing.status == OPEN_SLOT_STATUS;
                if !unchanged {
                    existing.end_time = row.end_time;
                    existing.is_online = row.is_online;
                    existing.status = OPEN_SLOT_STATUS.to_string();
                    existing.generated_at = now;
                    outcome.upserted += 1;
                }
                continue;
            }

            let id = t.next_id();
            t.open_slots.insert(
                key,
                OpenSlot {
                    id,
                    trainer_id: row.trainer_id,
                    slot_date: row.slot_date,
                    start_time: row.start_time,
                    end_time: row.end_time,
                    is_online: row.is_online,
                    status: OPEN_SLOT_STATUS.to_string(),
                    generated_at: now,
                },
            );
            outcome.upserted += 1;
        }

        let keep: HashSet<(NaiveDate, NaiveTime)> =
            rows.iter().map(|r| (r.slot_date, r.start_time)).collect();
        let before = t.open_slots.len();
        t.open_slots.retain(|(owner, date, start), _| {
            *owner != trainer_id || *date < from || *date >= until || keep.contains(&(*date, *start))
        });
        outcome.deleted = (before - t.open_slots.len()) as u64;

        Ok(outcome)
    }

    async fn list_open_slots(
        &self,
        trainer_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<OpenSlot>> {
        let t = self.tables()?;
        Ok(t.open_slots
            .range((trainer_id, from, NaiveTime::MIN)..)
            .take_while(|((owner, date, _), _)| *owner == trainer_id && *date <= to)
            .map(|(_, slot)| slot.clone())
            .collect())
    }
}
