//! The storage seam consumed by the slot materializer, the booking flow and
//! the HTTP handlers.
//!
//! [`ScheduleStore`] is object safe so callers can hold an
//! `Arc<dyn ScheduleStore>`. [`PgScheduleStore`] delegates to the
//! repositories.

use async_trait::async_trait;
use chrono::NaiveDate;
use fitslot_core::availability::{ScheduleSettings as CoreSettings, TrainerSchedule};
use fitslot_core::booking::BookingStatus;
use fitslot_core::types::DbId;

use crate::models::availability::{AvailabilityWindow, NewAvailabilityWindow};
use crate::models::booking::{Booking, NewBooking};
use crate::models::holiday::{Holiday, NewHoliday};
use crate::models::open_slot::{NewOpenSlot, OpenSlot, ReplaceOutcome};
use crate::models::schedule_break::{NewScheduleBreak, ScheduleBreak};
use crate::models::schedule_settings::ScheduleSettings;
use crate::models::trainer::{CreateTrainer, Trainer};
use crate::repositories::{
    AvailabilityWindowRepo, BookingRepo, HolidayRepo, OpenSlotRepo, ScheduleBreakRepo,
    ScheduleSettingsRepo, TrainerRepo,
};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL `exclusion_violation`.
const EXCLUSION_VIOLATION: &str = "23P01";
/// PostgreSQL `check_violation`.
const CHECK_VIOLATION: &str = "23514";
/// PostgreSQL `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or the query failed.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness or exclusion constraint rejected the write.
    #[error("Write conflicts with existing data ({constraint})")]
    Conflict { constraint: String },

    /// A check or foreign-key constraint rejected the write.
    #[error("Write rejected by constraint {constraint}")]
    Rejected { constraint: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION | EXCLUSION_VIOLATION) => {
                    return StoreError::Conflict { constraint };
                }
                Some(CHECK_VIOLATION | FOREIGN_KEY_VIOLATION) => {
                    return StoreError::Rejected { constraint };
                }
                _ => {}
            }
        }
        tracing::error!(error = %err, "Database error");
        StoreError::Unavailable(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Queries and writes the availability core needs from persistence.
///
/// Date ranges named `from`/`to` are inclusive; `until` is exclusive.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Verify the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    // -- trainers -------------------------------------------------------------

    async fn create_trainer(&self, input: &CreateTrainer) -> StoreResult<Trainer>;
    async fn find_trainer(&self, id: DbId) -> StoreResult<Option<Trainer>>;
    async fn list_trainer_ids(&self) -> StoreResult<Vec<DbId>>;

    // -- availability windows -----------------------------------------------

    async fn list_windows(&self, trainer_id: DbId) -> StoreResult<Vec<AvailabilityWindow>>;
    async fn create_window(
        &self,
        trainer_id: DbId,
        input: &NewAvailabilityWindow,
    ) -> StoreResult<AvailabilityWindow>;
    async fn update_window(
        &self,
        trainer_id: DbId,
        window_id: DbId,
        input: &NewAvailabilityWindow,
    ) -> StoreResult<Option<AvailabilityWindow>>;
    async fn delete_window(&self, trainer_id: DbId, window_id: DbId) -> StoreResult<bool>;

    // -- breaks ---------------------------------------------------------------

    async fn list_breaks(&self, trainer_id: DbId) -> StoreResult<Vec<ScheduleBreak>>;
    async fn create_break(
        &self,
        trainer_id: DbId,
        input: &NewScheduleBreak,
    ) -> StoreResult<ScheduleBreak>;
    async fn delete_break(&self, trainer_id: DbId, break_id: DbId) -> StoreResult<bool>;

    // -- holidays -------------------------------------------------------------

    async fn list_holidays(&self, trainer_id: DbId) -> StoreResult<Vec<Holiday>>;
    async fn create_holiday(&self, trainer_id: DbId, input: &NewHoliday) -> StoreResult<Holiday>;
    async fn delete_holiday(&self, trainer_id: DbId, holiday_id: DbId) -> StoreResult<bool>;

    // -- settings -------------------------------------------------------------

    async fn find_settings(&self, trainer_id: DbId) -> StoreResult<Option<ScheduleSettings>>;
    async fn upsert_settings(
        &self,
        trainer_id: DbId,
        input: &CoreSettings,
    ) -> StoreResult<ScheduleSettings>;

    // -- bookings -------------------------------------------------------------

    async fn list_bookings(
        &self,
        trainer_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Booking>>;
    async fn find_booking(&self, id: DbId) -> StoreResult<Option<Booking>>;
    /// Insert a booking. Must fail with [`StoreError::Conflict`] when the
    /// interval overlaps a pending/accepted booking of the same trainer.
    async fn insert_booking(&self, input: &NewBooking) -> StoreResult<Booking>;
    async fn update_booking_status(
        &self,
        id: DbId,
        status: BookingStatus,
    ) -> StoreResult<Option<Booking>>;

    // -- open slots -----------------------------------------------------------

    /// Make `[from, until)` hold exactly `rows` for `trainer_id`.
    async fn replace_open_slots(
        &self,
        trainer_id: DbId,
        from: NaiveDate,
        until: NaiveDate,
        rows: &[NewOpenSlot],
    ) -> StoreResult<ReplaceOutcome>;
    async fn list_open_slots(
        &self,
        trainer_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<OpenSlot>>;

    // -- derived --------------------------------------------------------------

    /// Load a trainer's recurring rules as pure core types.
    ///
    /// Rows that cannot be converted (out-of-range weekday) are skipped.
    /// Missing settings fall back to the defaults.
    async fn load_schedule(&self, trainer_id: DbId) -> StoreResult<TrainerSchedule> {
        let windows = self.list_windows(trainer_id).await?;
        let breaks = self.list_breaks(trainer_id).await?;
        let holidays = self.list_holidays(trainer_id).await?;
        let settings = self.find_settings(trainer_id).await?;

        Ok(TrainerSchedule {
            windows: windows.iter().filter_map(AvailabilityWindow::to_weekly).collect(),
            breaks: breaks.iter().filter_map(ScheduleBreak::to_recurring).collect(),
            holidays: holidays.iter().map(Holiday::to_range).collect(),
            settings: settings.map(|s| s.to_core()).unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL implementation
// ---------------------------------------------------------------------------

/// [`ScheduleStore`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgScheduleStore {
    pool: DbPool,
}

impl PgScheduleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ScheduleStore for PgScheduleStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn create_trainer(&self, input: &CreateTrainer) -> StoreResult<Trainer> {
        Ok(TrainerRepo::create(&self.pool, input).await?)
    }

    async fn find_trainer(&self, id: DbId) -> StoreResult<Option<Trainer>> {
        Ok(TrainerRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_trainer_ids(&self) -> StoreResult<Vec<DbId>> {
        Ok(TrainerRepo::list_ids(&self.pool).await?)
    }

    async fn list_windows(&self, trainer_id: DbId) -> StoreResult<Vec<AvailabilityWindow>> {
        Ok(AvailabilityWindowRepo::list_by_trainer(&self.pool, trainer_id).await?)
    }

    async fn create_window(
        &self,
        trainer_id: DbId,
        input: &NewAvailabilityWindow,
    ) -> StoreResult<AvailabilityWindow> {
        Ok(AvailabilityWindowRepo::create(&self.pool, trainer_id, input).await?)
    }

    async fn update_window(
        &self,
        trainer_id: DbId,
        window_id: DbId,
        input: &NewAvailabilityWindow,
    ) -> StoreResult<Option<AvailabilityWindow>> {
        Ok(AvailabilityWindowRepo::update(&self.pool, trainer_id, window_id, input).await?)
    }

    async fn delete_window(&self, trainer_id: DbId, window_id: DbId) -> StoreResult<bool> {
        Ok(AvailabilityWindowRepo::delete(&self.pool, trainer_id, window_id).await?)
    }

    async fn list_breaks(&self, trainer_id: DbId) -> StoreResult<Vec<ScheduleBreak>> {
        Ok(ScheduleBreakRepo::list_by_trainer(&self.pool, trainer_id).await?)
    }

    async fn create_break(
        &self,
        trainer_id: DbId,
        input: &NewScheduleBreak,
    ) -> StoreResult<ScheduleBreak> {
        Ok(ScheduleBreakRepo::create(&self.pool, trainer_id, input).await?)
    }

    async fn delete_break(&self, trainer_id: DbId, break_id: DbId) -> StoreResult<bool> {
        Ok(ScheduleBreakRepo::delete(&self.pool, trainer_id, break_id).await?)
    }

    async fn list_holidays(&self, trainer_id: DbId) -> StoreResult<Vec<Holiday>> {
        Ok(HolidayRepo::list_by_trainer(&self.pool, trainer_id).await?)
    }

    async fn create_holiday(&self, trainer_id: DbId, input: &NewHoliday) -> StoreResult<Holiday> {
        Ok(HolidayRepo::create(&self.pool, trainer_id, input).await?)
    }

    async fn delete_holiday(&self, trainer_id: DbId, holiday_id: DbId) -> StoreResult<bool> {
        Ok(HolidayRepo::delete(&self.pool, trainer_id, holiday_id).await?)
    }

    async fn find_settings(&self, trainer_id: DbId) -> StoreResult<Option<ScheduleSettings>> {
        Ok(ScheduleSettingsRepo::find_by_trainer(&self.pool, trainer_id).await?)
    }

    async fn upsert_settings(
        &self,
        trainer_id: DbId,
        input: &CoreSettings,
    ) -> StoreResult<ScheduleSettings> {
        Ok(ScheduleSettingsRepo::upsert(&self.pool, trainer_id, input).await?)
    }

    async fn list_bookings(
        &self,
        trainer_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Booking>> {
        Ok(BookingRepo::list_by_trainer_range(&self.pool, trainer_id, from, to).await?)
    }

    async fn find_booking(&self, id: DbId) -> StoreResult<Option<Booking>> {
        Ok(BookingRepo::find_by_id(&self.pool, id).await?)
    }

    async fn insert_booking(&self, input: &NewBooking) -> StoreResult<Booking> {
        Ok(BookingRepo::create(&self.pool, input).await?)
    }

    async fn update_booking_status(
        &self,
        id: DbId,
        status: BookingStatus,
    ) -> StoreResult<Option<Booking>> {
        Ok(BookingRepo::update_status(&self.pool, id, status).await?)
    }

    async fn replace_open_slots(
        &self,
        trainer_id: DbId,
        from: NaiveDate,
        until: NaiveDate,
        rows: &[NewOpenSlot],
    ) -> StoreResult<ReplaceOutcome> {
        Ok(OpenSlotRepo::replace_range(&self.pool, trainer_id, from, until, rows).await?)
    }

    async fn list_open_slots(
        &self,
        trainer_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<OpenSlot>> {
        Ok(OpenSlotRepo::list_by_trainer_range(&self.pool, trainer_id, from, to).await?)
    }
}
