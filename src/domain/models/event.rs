use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// A master event: the repeating template that instances are materialized
/// from. Times of day are wall-clock `HH:MM:SS` strings; `weekdays` is a
/// JSON-encoded array of integers (0 = Sunday) and only meaningful while
/// `pattern` is `weekly`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct MasterEvent {
    pub id: String,
    pub bar_id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub event_tag_id: String,
    pub start_time: String,
    pub end_time: String,
    pub crosses_midnight: bool,
    pub pattern: String,
    pub weekdays: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_occurrences: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
