//! Two-phase booking and booking status transitions.
//!
//! [`propose_booking`] performs the optimistic checks against a fresh read
//! of the trainer's day and returns a [`TentativeBooking`]. The insert in
//! [`TentativeBooking::confirm`] is authoritative: the store rejects an
//! interval that a concurrent request claimed in between.

use chrono::NaiveDate;
use fitslot_core::availability::validate_time_range;
use fitslot_core::booking::{validate_booking, BookingOrigin, BookingStatus};
use fitslot_core::civil_time::{format_hhmm, time_of};
use fitslot_core::error::CoreError;
use fitslot_core::interval::Interval;
use fitslot_core::timezone::has_elapsed;
use fitslot_core::types::{DbId, Minute, Timestamp};
use fitslot_db::models::booking::{Booking, NewBooking};
use fitslot_db::{ScheduleStore, StoreError};

use crate::error::{WorkerError, WorkerResult};
use crate::schedule::{busy_on, require_trainer, trainer_timezone};

/// A booking request, times already parsed into minutes of day.
///
/// The end is taken from `end`, else `start + duration`, else
/// `start + slot_minutes` from the trainer's settings.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub trainer_id: DbId,
    pub user_id: Option<DbId>,
    pub date: NaiveDate,
    pub start: Minute,
    pub end: Option<Minute>,
    pub duration: Option<Minute>,
    pub is_online: bool,
    pub note: Option<String>,
}

/// A booking that passed the optimistic checks but is not stored yet.
#[derive(Debug, Clone)]
pub struct TentativeBooking {
    pub interval: Interval,
    row: NewBooking,
}

impl TentativeBooking {
    pub fn status(&self) -> BookingStatus {
        self.row.status
    }

    /// Insert the booking. A concurrent overlapping booking surfaces as
    /// [`CoreError::Conflict`].
    pub async fn confirm(self, store: &dyn ScheduleStore) -> WorkerResult<Booking> {
        match store.insert_booking(&self.row).await {
            Ok(booking) => {
                tracing::info!(
                    booking_id = booking.id,
                    trainer_id = booking.trainer_id,
                    date = %booking.booking_date,
                    status = %booking.status,
                    "Booking created",
                );
                Ok(booking)
            }
            Err(StoreError::Conflict { constraint }) => {
                tracing::info!(
                    trainer_id = self.row.trainer_id,
                    %constraint,
                    "Booking lost a concurrent race",
                );
                Err(CoreError::Conflict(format!(
                    "Slot {}-{} on {} was just booked by someone else",
                    format_hhmm(self.interval.start),
                    format_hhmm(self.interval.end),
                    self.row.booking_date,
                ))
                .into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Run the optimistic checks for `request`.
///
/// - the trainer exists and the start has not passed in their timezone,
/// - the interval is non-empty and within the day,
/// - it overlaps none of that day's pending/accepted bookings,
/// - for client bookings, it lies inside one bookable piece of the day.
pub async fn propose_booking(
    store: &dyn ScheduleStore,
    request: &BookingRequest,
    origin: BookingOrigin,
    now: Timestamp,
) -> WorkerResult<TentativeBooking> {
    let trainer = require_trainer(store, request.trainer_id).await?;
    let tz = trainer_timezone(&trainer)?;
    let schedule = store.load_schedule(trainer.id).await?;

    let end = match (request.end, request.duration) {
        (Some(end), _) => Some(end),
        (None, Some(duration)) => request.start.checked_add(duration),
        (None, None) => request.start.checked_add(schedule.settings.slot_minutes),
    }
    .ok_or_else(|| {
        CoreError::InvalidRange(format!(
            "Booking starting at {} does not end within the day",
            format_hhmm(request.start)
        ))
    })?;
    let interval = validate_time_range(request.start, end)?;

    if has_elapsed(tz, request.date, request.start, now) {
        return Err(CoreError::Validation(format!(
            "Cannot book {} on {}: start time has already passed",
            format_hhmm(interval.start),
            request.date
        ))
        .into());
    }

    let busy = busy_on(store, trainer.id, request.date).await?;
    validate_booking(interval, &busy)?;

    if origin == BookingOrigin::Client && !schedule.is_bookable(request.date, interval) {
        return Err(CoreError::Validation(format!(
            "{}-{} on {} is outside the trainer's availability",
            format_hhmm(interval.start),
            format_hhmm(interval.end),
            request.date
        ))
        .into());
    }

    let (Some(start_time), Some(end_time)) = (time_of(interval.start), time_of(interval.end)) else {
        return Err(CoreError::InvalidRange(format!(
            "Booking must end before midnight, got {}",
            format_hhmm(interval.end)
        ))
        .into());
    };

    Ok(TentativeBooking {
        interval,
        row: NewBooking {
            trainer_id: trainer.id,
            user_id: request.user_id,
            booking_date: request.date,
            start_time,
            end_time,
            duration_min: interval.len() as i32,
            status: origin.initial_status(),
            is_online: request.is_online,
            note: request.note.clone(),
        },
    })
}

/// Propose and immediately confirm.
pub async fn book(
    store: &dyn ScheduleStore,
    request: &BookingRequest,
    origin: BookingOrigin,
    now: Timestamp,
) -> WorkerResult<Booking> {
    propose_booking(store, request, origin, now)
        .await?
        .confirm(store)
        .await
}

/// Move a booking to `to`.
///
/// Follows [`BookingStatus::valid_transitions`]; cancelling an accepted
/// booking is refused once its end has passed in the trainer's timezone.
pub async fn transition_booking(
    store: &dyn ScheduleStore,
    booking_id: DbId,
    to: BookingStatus,
    now: Timestamp,
) -> WorkerResult<Booking> {
    let not_found = || -> WorkerError {
        CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        }
        .into()
    };

    let booking = store.find_booking(booking_id).await?.ok_or_else(not_found)?;
    let current: BookingStatus = booking.status.parse().map_err(|_| {
        CoreError::Conflict(format!(
            "Booking {booking_id} has unrecognised status '{}'",
            booking.status
        ))
    })?;
    current.validate_transition(to)?;

    if current == BookingStatus::Accepted && to == BookingStatus::Cancelled {
        let trainer = require_trainer(store, booking.trainer_id).await?;
        let tz = trainer_timezone(&trainer)?;
        let end = booking
            .span()
            .end_minute()
            .ok_or_else(|| CoreError::Internal(format!("Booking {booking_id} has no end")))?;
        if has_elapsed(tz, booking.booking_date, end, now) {
            return Err(CoreError::Conflict(format!(
                "Booking {booking_id} has already taken place and cannot be cancelled"
            ))
            .into());
        }
    }

    let updated = store
        .update_booking_status(booking_id, to)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(booking_id, from = %current, to = %to, "Booking status changed");
    Ok(updated)
}
