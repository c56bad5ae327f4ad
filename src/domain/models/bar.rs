use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Bar {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Bar {
    pub fn new(name: String, address: String, city: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            address,
            city,
            latitude: None,
            longitude: None,
            description: None,
            website: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
