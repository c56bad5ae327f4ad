use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One materialized occurrence of a master event. Every `custom_*` field is
/// an independently nullable override of the corresponding master field;
/// `crosses_midnight` is kept in step with whichever time pair is currently
/// effective for this occurrence.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventInstance {
    pub id: String,
    pub event_id: String,
    pub date: NaiveDate,
    pub custom_title: Option<String>,
    pub custom_description: Option<String>,
    pub custom_start_time: Option<String>,
    pub custom_end_time: Option<String>,
    pub custom_image_url: Option<String>,
    pub custom_external_link: Option<String>,
    pub custom_tag_id: Option<String>,
    pub is_cancelled: bool,
    pub crosses_midnight: bool,
    pub created_at: DateTime<Utc>,
}

impl EventInstance {
    pub fn new(event_id: String, date: NaiveDate, crosses_midnight: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            date,
            custom_title: None,
            custom_description: None,
            custom_start_time: None,
            custom_end_time: None,
            custom_image_url: None,
            custom_external_link: None,
            custom_tag_id: None,
            is_cancelled: false,
            crosses_midnight,
            created_at: Utc::now(),
        }
    }
}
