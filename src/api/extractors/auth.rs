use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::domain::models::user::User;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::Span;

/// Authenticated caller. The bearer token carries only the subject id;
/// the user record (and with it the admin flag) is re-read from the store
/// on every request.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

        let claims = app_state.auth_service.verify_token(token)?;

        let user = app_state
            .user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Span::current().record("user_id", user.id.as_str());

        Ok(AuthUser(user))
    }
}

pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(AppError::Forbidden(
                "Access denied. Admin privileges required.".into(),
            ));
        }

        Ok(AdminUser(user))
    }
}
