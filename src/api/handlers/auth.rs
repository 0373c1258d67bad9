use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::{
    requests::{LoginRequest, RegisterRequest},
    responses::MessageResponse,
};
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::User;
use crate::domain::services::auth_service::{hash_password, verify_password};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("name, email and password are required".into()));
    }

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(payload.name, payload.email, password_hash);
    let created = state.user_repo.create(&user).await?;

    info!("User registered: {}", created.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse { message: "User registered".into() }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_email(&payload.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.auth_service.issue_token(&user)?;

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        token,
        user: UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
        },
    }))
}
