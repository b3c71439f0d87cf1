//! Booking rows and their normalization into busy spans.

use chrono::{NaiveDate, NaiveTime};
use fitslot_core::booking::{BookingSpan, BookingStatus};
use fitslot_core::civil_time::minute_of;
use fitslot_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bookings` table.
///
/// Older rows may carry only `duration_min`; see [`Booking::span`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub trainer_id: DbId,
    pub user_id: Option<DbId>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub duration_min: Option<i32>,
    pub status: String,
    pub is_online: bool,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// The optional-field view consumed by busy derivation.
    pub fn span(&self) -> BookingSpan {
        BookingSpan {
            start_minute: minute_of(self.start_time),
            end_minute: self.end_time.map(minute_of),
            duration_minutes: self
                .duration_min
                .and_then(|d| u32::try_from(d).ok()),
            status: self.status.clone(),
        }
    }
}

/// DTO for inserting a booking whose interval has already been validated.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub trainer_id: DbId,
    pub user_id: Option<DbId>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_min: i32,
    pub status: BookingStatus,
    pub is_online: bool,
    pub note: Option<String>,
}
