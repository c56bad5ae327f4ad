use serde::Deserialize;

use crate::domain::services::scheduler::{BoolPayload, EventPatch, InstancePatch};

#[derive(Deserialize)]
pub struct CreateBarRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBarRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub event_tag_id: String,
    pub start_time: String,
    pub end_time: String,
    pub pattern: Option<String>,
    pub weekdays: Option<Vec<i64>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_occurrences: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub event_tag_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub pattern: Option<String>,
    pub weekdays: Option<Vec<i64>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_occurrences: Option<i64>,
    pub regenerate_instances: Option<bool>,
    pub cancel_all_instances: Option<bool>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(req: UpdateEventRequest) -> Self {
        EventPatch {
            title: req.title,
            description: req.description,
            image_url: req.image_url,
            external_link: req.external_link,
            event_tag_id: req.event_tag_id,
            start_time: req.start_time,
            end_time: req.end_time,
            pattern: req.pattern,
            weekdays: req.weekdays,
            start_date: req.start_date,
            end_date: req.end_date,
            max_occurrences: req.max_occurrences,
            regenerate_instances: req.regenerate_instances,
            cancel_all_instances: req.cancel_all_instances,
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateInstanceRequest {
    pub date: Option<String>,
    pub custom_title: Option<String>,
    pub custom_description: Option<String>,
    pub custom_start_time: Option<String>,
    pub custom_end_time: Option<String>,
    pub custom_image_url: Option<String>,
    pub custom_external_link: Option<String>,
    pub custom_tag_id: Option<String>,
    pub is_cancelled: Option<BoolPayload>,
}

impl From<UpdateInstanceRequest> for InstancePatch {
    fn from(req: UpdateInstanceRequest) -> Self {
        InstancePatch {
            date: req.date,
            custom_title: req.custom_title,
            custom_description: req.custom_description,
            custom_start_time: req.custom_start_time,
            custom_end_time: req.custom_end_time,
            custom_image_url: req.custom_image_url,
            custom_external_link: req.custom_external_link,
            custom_tag_id: req.custom_tag_id,
            is_cancelled: req.is_cancelled,
        }
    }
}
