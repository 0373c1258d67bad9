#![allow(dead_code)]

use activity_booking::{
    api::router::create_router,
    config::Config,
    domain::models::user::User,
    domain::services::auth_service::{hash_password, AuthService},
    infra::repositories::{
        sqlite_activity_repo::SqliteActivityRepo, sqlite_booking_repo::SqliteBookingRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::{json, Value};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            jwt_secret: "test-secret".to_string(),
            admin_email: None,
            admin_password: None,
        };

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            activity_repo: Arc::new(SqliteActivityRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            auth_service: Arc::new(AuthService::new(&config.jwt_secret)),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) {
        let response = self
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": password })),
            )
            .await;
        assert!(
            response.status().is_success(),
            "register failed in test helper: status {}",
            response.status()
        );
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .send(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert!(
            response.status().is_success(),
            "login failed in test helper: status {}",
            response.status()
        );
        let body = parse_body(response).await;
        body["token"].as_str().expect("No token in login body").to_string()
    }

    /// Registration never grants the admin flag, so tests seed admins
    /// directly through the repository, as the bootstrap factory does.
    pub async fn seed_admin(&self, email: &str, password: &str) {
        let hash = hash_password(password).unwrap();
        let mut admin = User::new("Admin".to_string(), email.to_string(), hash);
        admin.is_admin = true;
        self.state.user_repo.create(&admin).await.unwrap();
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
