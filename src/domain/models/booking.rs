use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Closed status set. Creation always yields `Confirmed`; `Cancelled` is
/// terminal. `Pending` exists in the stored vocabulary but no code path
/// produces it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Pending,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Pending => "pending",
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "pending" => Ok(BookingStatus::Pending),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub activity_id: String,
    pub selected_date: NaiveDate,
    /// Slot label, always "HH:00-HH:00".
    pub time_slot: String,
    pub number_of_places: i32,
    /// places x activity price at creation time; never recomputed.
    pub total_price: f64,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub user_id: String,
    pub activity_id: String,
    pub selected_date: NaiveDate,
    pub time_slot: String,
    pub number_of_places: i32,
    pub total_price: f64,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            activity_id: params.activity_id,
            selected_date: params.selected_date,
            time_slot: params.time_slot,
            number_of_places: params.number_of_places,
            total_price: params.total_price,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }
}
