use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One bookable calendar day with its open/close times ("HH:MM").
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub place: String,
    #[sqlx(json)]
    pub available_dates: Vec<DateWindow>,
    pub price: f64,
    pub total_places: i32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewActivityParams {
    pub name: String,
    pub description: String,
    pub category: String,
    pub place: String,
    pub available_dates: Vec<DateWindow>,
    pub price: f64,
    pub total_places: i32,
    pub created_by: String,
}

impl Activity {
    pub fn new(params: NewActivityParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            category: params.category,
            place: params.place,
            available_dates: params.available_dates,
            price: params.price,
            total_places: params.total_places,
            created_by: params.created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// The window offered on `date`, compared by calendar day.
    pub fn window_for(&self, date: NaiveDate) -> Option<&DateWindow> {
        self.available_dates.iter().find(|w| w.date == date)
    }
}

/// Serde helper for fields that hold a calendar date but may arrive either
/// as `YYYY-MM-DD` or as a full RFC 3339 timestamp. Timestamps are
/// normalized to their date component; serialization always emits the
/// plain date.
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        chrono::DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .map_err(|_| format!("invalid date: {raw}"))
    }
}
