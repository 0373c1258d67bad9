use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_checked(&self, booking: &Booking, _total_places: i32) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the activity serializes competing attempts per
        // activity, so the sum below cannot go stale before the insert.
        let activity_row = sqlx::query("SELECT total_places FROM activities WHERE id = $1 FOR UPDATE")
            .bind(&booking.activity_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        // The activity can disappear between the handler's lookup and this
        // transaction; a booking must never reference a deleted activity.
        let total = match activity_row {
            Some(row) => row.get::<i32, _>("total_places"),
            None => return Err(AppError::NotFound("Activity not found".into())),
        };

        let booked: i64 = sqlx::query(
            "SELECT COALESCE(SUM(number_of_places), 0) AS booked FROM bookings
             WHERE activity_id = $1 AND selected_date = $2 AND time_slot = $3 AND status = 'confirmed'",
        )
        .bind(&booking.activity_id)
        .bind(booking.selected_date)
        .bind(&booking.time_slot)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .get("booked");

        let remaining = total as i64 - booked;
        if booking.number_of_places as i64 > remaining {
            return Err(AppError::CapacityExceeded(remaining));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, user_id, activity_id, selected_date, time_slot, number_of_places, total_price, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(&booking.id)
        .bind(&booking.user_id)
        .bind(&booking.activity_id)
        .bind(booking.selected_date)
        .bind(&booking.time_slot)
        .bind(booking.number_of_places)
        .bind(booking.total_price)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_activity(&self, activity_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE activity_id = $1 ORDER BY selected_date ASC, time_slot ASC",
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_confirmed_for_date(&self, activity_id: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE activity_id = $1 AND selected_date = $2 AND status = 'confirmed'",
        )
        .bind(activity_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn set_cancelled(&self, id: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled', updated_at = $1 WHERE id = $2 RETURNING *",
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn cancel_confirmed_for_activity(&self, activity_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', updated_at = $1 WHERE activity_id = $2 AND status = 'confirmed'",
        )
        .bind(Utc::now())
        .bind(activity_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn cancel_confirmed_for_dates(&self, activity_id: &str, dates: &[NaiveDate]) -> Result<u64, AppError> {
        if dates.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', updated_at = $1
             WHERE activity_id = $2 AND status = 'confirmed' AND selected_date = ANY($3)",
        )
        .bind(Utc::now())
        .bind(activity_id)
        .bind(dates)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
