use crate::config::Config;
use crate::domain::ports::{ActivityRepository, BookingRepository, UserRepository};
use crate::domain::services::auth_service::AuthService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub activity_repo: Arc<dyn ActivityRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub auth_service: Arc<AuthService>,
}
