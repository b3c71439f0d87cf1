use chrono::NaiveDate;
use fitslot_core::booking::BookingStatus;
use fitslot_core::types::DbId;
use sqlx::PgPool;

use crate::models::booking::{Booking, NewBooking};

const COLUMNS: &str = "\
    id, trainer_id, user_id, booking_date, start_time, end_time, duration_min, \
    status, is_online, note, created_at, updated_at";

/// CRUD for the `bookings` table.
pub struct BookingRepo;

impl BookingRepo {
    /// List a trainer's bookings with `from <= booking_date <= to`, any status.
    pub async fn list_by_trainer_range(
        pool: &PgPool,
        trainer_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE trainer_id = $1 AND booking_date BETWEEN $2 AND $3 \
             ORDER BY booking_date, start_time, id"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(trainer_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a booking. Overlaps with pending/accepted rows of the same
    /// trainer fail on `ex_bookings_no_overlap`.
    pub async fn create(pool: &PgPool, input: &NewBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings \
                (trainer_id, user_id, booking_date, start_time, end_time, duration_min, \
                 status, is_online, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.trainer_id)
            .bind(input.user_id)
            .bind(input.booking_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.duration_min)
            .bind(input.status.as_str())
            .bind(input.is_online)
            .bind(&input.note)
            .fetch_one(pool)
            .await
    }

    /// Set a booking's status. Transition rules are enforced by the caller.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
