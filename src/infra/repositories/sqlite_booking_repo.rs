use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn confirmed_sum(&self, activity_id: &str, date: NaiveDate, slot: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(number_of_places), 0) AS booked FROM bookings
             WHERE activity_id = ? AND selected_date = ? AND time_slot = ? AND status = 'confirmed'",
        )
        .bind(activity_id)
        .bind(date)
        .bind(slot)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("booked"))
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_checked(&self, booking: &Booking, total_places: i32) -> Result<Booking, AppError> {
        // Guarded insert: the capacity test and the write are one statement,
        // atomic under SQLite's single-writer model.
        let result = sqlx::query(
            "INSERT INTO bookings (id, user_id, activity_id, selected_date, time_slot, number_of_places, total_price, status, created_at, updated_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE (
                 SELECT COALESCE(SUM(number_of_places), 0) FROM bookings
                 WHERE activity_id = ? AND selected_date = ? AND time_slot = ? AND status = 'confirmed'
             ) + ? <= ?
             AND EXISTS (SELECT 1 FROM activities WHERE id = ?)",
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
        .bind(&booking.activity_id)
        .bind(booking.selected_date)
        .bind(&booking.time_slot)
        .bind(booking.number_of_places)
        .bind(total_places)
        .bind(&booking.activity_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            let activity_exists = sqlx::query("SELECT 1 FROM activities WHERE id = ?")
                .bind(&booking.activity_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?
                .is_some();
            if !activity_exists {
                return Err(AppError::NotFound("Activity not found".into()));
            }
            let booked = self
                .confirmed_sum(&booking.activity_id, booking.selected_date, &booking.time_slot)
                .await?;
            return Err(AppError::CapacityExceeded(total_places as i64 - booked));
        }

        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(&booking.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = ? ORDER BY created_at DESC")
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
            "SELECT * FROM bookings WHERE activity_id = ? ORDER BY selected_date ASC, time_slot ASC",
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_confirmed_for_date(&self, activity_id: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE activity_id = ? AND selected_date = ? AND status = 'confirmed'",
        )
        .bind(activity_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn set_cancelled(&self, id: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled', updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn cancel_confirmed_for_activity(&self, activity_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', updated_at = ? WHERE activity_id = ? AND status = 'confirmed'",
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

        let placeholders = vec!["?"; dates.len()].join(", ");
        let sql = format!(
            "UPDATE bookings SET status = 'cancelled', updated_at = ?
             WHERE activity_id = ? AND status = 'confirmed' AND selected_date IN ({placeholders})"
        );

        let mut query = sqlx::query(&sql).bind(Utc::now()).bind(activity_id);
        for date in dates {
            query = query.bind(*date);
        }

        let result = query.execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
