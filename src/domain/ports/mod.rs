use crate::domain::models::{activity::Activity, booking::Booking, user::User};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn create(&self, activity: &Activity) -> Result<Activity, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Activity>, AppError>;
    async fn list(&self) -> Result<Vec<Activity>, AppError>;
    async fn update(&self, activity: &Activity) -> Result<Activity, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking only if the confirmed sum for its
    /// (activity, date, slot) tuple leaves room for it; otherwise fails
    /// with `CapacityExceeded` carrying the remaining count. The check and
    /// the insert are atomic with respect to concurrent attempts on the
    /// same tuple.
    async fn create_checked(&self, booking: &Booking, total_places: i32) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
    async fn list_by_activity(&self, activity_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_confirmed_for_date(&self, activity_id: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError>;
    async fn set_cancelled(&self, id: &str) -> Result<Booking, AppError>;
    async fn cancel_confirmed_for_activity(&self, activity_id: &str) -> Result<u64, AppError>;
    async fn cancel_confirmed_for_dates(&self, activity_id: &str, dates: &[NaiveDate]) -> Result<u64, AppError>;
}
