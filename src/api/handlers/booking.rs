use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::CreateBookingRequest;
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::activity::calendar_date;
use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams};
use crate::domain::models::user::User;
use crate::domain::services::slots::slots_for_date;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

/// The booking gate. Preconditions run in order; the capacity check and
/// the insert happen atomically inside the repository.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.number_of_places < 1 {
        return Err(AppError::Validation("numberOfPlaces must be at least 1".into()));
    }

    let activity = state
        .activity_repo
        .find_by_id(&payload.activity_id)
        .await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;

    let selected_date = calendar_date::parse(&payload.selected_date).map_err(AppError::Validation)?;

    if activity.window_for(selected_date).is_none() {
        return Err(AppError::InvalidDate);
    }

    if !slots_for_date(&activity, selected_date).contains(&payload.time_slot) {
        warn!(
            "Booking rejected: slot {} not offered by activity {} on {}",
            payload.time_slot, activity.id, selected_date
        );
        return Err(AppError::Validation(
            "Selected time slot is not available for this activity".into(),
        ));
    }

    let total_price = payload.number_of_places as f64 * activity.price;

    let booking = Booking::new(NewBookingParams {
        user_id: user.id,
        activity_id: activity.id.clone(),
        selected_date,
        time_slot: payload.time_slot,
        number_of_places: payload.number_of_places,
        total_price,
    });

    let created = state.booking_repo.create_checked(&booking, activity.total_places).await?;

    info!("Booking confirmed: {} for activity {}", created.id, activity.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_user(&user.id).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    authorize_owner_or_admin(&booking, &user)?;

    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    authorize_owner_or_admin(&booking, &user)?;

    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::AlreadyCancelled);
    }

    let cancelled = state.booking_repo.set_cancelled(&booking.id).await?;

    info!("Booking cancelled: {}", cancelled.id);
    Ok(Json(cancelled))
}

pub async fn list_all_bookings(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_all().await?;
    Ok(Json(bookings))
}

pub async fn list_activity_bookings(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(activity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_activity(&activity_id).await?;
    Ok(Json(bookings))
}

fn authorize_owner_or_admin(booking: &Booking, user: &User) -> Result<(), AppError> {
    if booking.user_id != user.id && !user.is_admin {
        return Err(AppError::Forbidden("Access denied".into()));
    }
    Ok(())
}
