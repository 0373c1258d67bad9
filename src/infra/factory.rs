use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::models::user::User;
use crate::domain::services::auth_service::{hash_password, AuthService};
use crate::infra::repositories::{
    postgres_activity_repo::PostgresActivityRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_user_repo::PostgresUserRepo, sqlite_activity_repo::SqliteActivityRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let auth_service = Arc::new(AuthService::new(&config.jwt_secret));

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            activity_repo: Arc::new(PostgresActivityRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool)),
            auth_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            activity_repo: Arc::new(SqliteActivityRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool)),
            auth_service,
        }
    };

    seed_admin(&state).await;
    state
}

/// Creates the admin account from ADMIN_EMAIL/ADMIN_PASSWORD on first
/// start; later starts leave the existing account alone.
async fn seed_admin(state: &AppState) {
    let (Some(email), Some(password)) = (
        state.config.admin_email.clone(),
        state.config.admin_password.clone(),
    ) else {
        return;
    };

    match state.user_repo.find_by_email(&email).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let hash = hash_password(&password).expect("Failed to hash admin password");
            let mut admin = User::new("Administrator".to_string(), email.clone(), hash);
            admin.is_admin = true;
            state
                .user_repo
                .create(&admin)
                .await
                .expect("Failed to seed admin user");
            info!("Seeded admin user: {}", email);
        }
        Err(e) => panic!("Failed to check for admin user: {e}"),
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
