use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::api::dtos::{
    requests::{CreateActivityRequest, UpdateActivityRequest},
    responses::ActivityDeletedResponse,
};
use crate::api::extractors::auth::AdminUser;
use crate::domain::models::activity::{calendar_date, Activity, DateWindow, NewActivityParams};
use crate::domain::services::slots::{parse_hour, slot_availability};
use crate::error::AppError;
use crate::state::AppState;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

pub async fn list_activities(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let activities = state.activity_repo.list().await?;
    Ok(Json(activities))
}

pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let activity = state
        .activity_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;
    Ok(Json(activity))
}

pub async fn get_timeslots(
    State(state): State<Arc<AppState>>,
    Path((id, date)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let activity = state
        .activity_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;

    let date = calendar_date::parse(&date).map_err(AppError::Validation)?;

    let confirmed = state.booking_repo.list_confirmed_for_date(&activity.id, date).await?;

    Ok(Json(slot_availability(&activity, date, &confirmed)))
}

pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_price(payload.price)?;
    validate_total_places(payload.total_places)?;
    validate_windows(&payload.available_dates)?;

    let activity = Activity::new(NewActivityParams {
        name: payload.name,
        description: payload.description,
        category: payload.category,
        place: payload.place,
        available_dates: payload.available_dates,
        price: payload.price,
        total_places: payload.total_places,
        created_by: admin.id,
    });

    let created = state.activity_repo.create(&activity).await?;
    info!("Activity created: {}", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_activity(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut activity = state
        .activity_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;

    // The whole payload must pass before anything is written or cancelled;
    // a rejected update leaves the bookings of every date untouched.
    if let Some(ref dates) = payload.available_dates {
        validate_windows(dates)?;
    }
    if let Some(val) = payload.price {
        validate_price(val)?;
    }
    if let Some(val) = payload.total_places {
        validate_total_places(val)?;
    }

    let mut removed: Vec<NaiveDate> = Vec::new();
    if let Some(dates) = payload.available_dates {
        let retained: HashSet<NaiveDate> = dates.iter().map(|w| w.date).collect();
        removed = activity
            .available_dates
            .iter()
            .map(|w| w.date)
            .filter(|d| !retained.contains(d))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        activity.available_dates = dates;
    }

    if let Some(val) = payload.name { activity.name = val; }
    if let Some(val) = payload.description { activity.description = val; }
    if let Some(val) = payload.category { activity.category = val; }
    if let Some(val) = payload.place { activity.place = val; }
    if let Some(val) = payload.price { activity.price = val; }
    if let Some(val) = payload.total_places { activity.total_places = val; }

    activity.updated_at = Utc::now();

    let updated = state.activity_repo.update(&activity).await?;

    let cancelled = state
        .booking_repo
        .cancel_confirmed_for_dates(&updated.id, &removed)
        .await?;
    if cancelled > 0 {
        info!("Cancelled {} bookings for removed dates on activity {}", cancelled, updated.id);
    }

    info!("Activity updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_activity(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let activity = state
        .activity_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;

    let cancelled = state
        .booking_repo
        .cancel_confirmed_for_activity(&activity.id)
        .await?;

    state.activity_repo.delete(&activity.id).await?;

    info!("Activity deleted: {} ({} bookings cancelled)", activity.id, cancelled);

    Ok(Json(ActivityDeletedResponse {
        message: "Activity deleted successfully".into(),
        cancelled_bookings: cancelled,
    }))
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if price < 0.0 || !price.is_finite() {
        return Err(AppError::Validation("price must be zero or positive".into()));
    }
    Ok(())
}

fn validate_total_places(total_places: i32) -> Result<(), AppError> {
    if total_places < 1 {
        return Err(AppError::Validation("totalPlaces must be at least 1".into()));
    }
    Ok(())
}

fn validate_windows(windows: &[DateWindow]) -> Result<(), AppError> {
    for window in windows {
        if parse_hour(&window.start_time).is_none() || parse_hour(&window.end_time).is_none() {
            return Err(AppError::Validation(
                "availableDates times must use the HH:MM format".into(),
            ));
        }
    }
    Ok(())
}
