use crate::domain::models::activity::DateWindow;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub place: String,
    pub available_dates: Vec<DateWindow>,
    pub price: f64,
    pub total_places: i32,
}

/// Explicit partial update: an omitted field keeps its stored value.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub place: Option<String>,
    pub available_dates: Option<Vec<DateWindow>>,
    pub price: Option<f64>,
    pub total_places: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub activity_id: String,
    /// "YYYY-MM-DD" or an RFC 3339 timestamp; normalized to the calendar day.
    pub selected_date: String,
    pub time_slot: String,
    pub number_of_places: i32,
}
