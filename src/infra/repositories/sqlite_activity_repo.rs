use crate::domain::{models::activity::Activity, ports::ActivityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{types::Json, SqlitePool};

pub struct SqliteActivityRepo {
    pool: SqlitePool,
}

impl SqliteActivityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for SqliteActivityRepo {
    async fn create(&self, activity: &Activity) -> Result<Activity, AppError> {
        sqlx::query_as::<_, Activity>(
            "INSERT INTO activities (id, name, description, category, place, available_dates, price, total_places, created_by, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&activity.id)
        .bind(&activity.name)
        .bind(&activity.description)
        .bind(&activity.category)
        .bind(&activity.place)
        .bind(Json(&activity.available_dates))
        .bind(activity.price)
        .bind(activity.total_places)
        .bind(&activity.created_by)
        .bind(activity.created_at)
        .bind(activity.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Activity>, AppError> {
        sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Activity>, AppError> {
        sqlx::query_as::<_, Activity>("SELECT * FROM activities ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, activity: &Activity) -> Result<Activity, AppError> {
        sqlx::query_as::<_, Activity>(
            "UPDATE activities
             SET name = ?, description = ?, category = ?, place = ?, available_dates = ?, price = ?, total_places = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&activity.name)
        .bind(&activity.description)
        .bind(&activity.category)
        .bind(&activity.place)
        .bind(Json(&activity.available_dates))
        .bind(activity.price)
        .bind(activity.total_places)
        .bind(activity.updated_at)
        .bind(&activity.id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Activity not found".into()));
        }
        Ok(())
    }
}
