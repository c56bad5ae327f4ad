use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest};
use crate::domain::models::event::MasterEvent;
use crate::domain::services::{recurrence, scheduler};
use crate::domain::services::recurrence::{RecurrenceInput, RecurrencePattern};
use crate::domain::services::scheduler::EventPatch;
use crate::error::AppError;
use std::sync::Arc;
use uuid::Uuid;
use chrono::Utc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Path(bar_id): Path<String>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bar = state.bar_repo.find_by_id(&bar_id).await?
        .ok_or(AppError::NotFound("Bar not found".into()))?;

    if !state.tag_repo.exists(&payload.event_tag_id).await? {
        return Err(AppError::NotFound("Tag not found".into()));
    }

    let mut errors = Vec::new();
    if payload.title.trim().is_empty() {
        errors.push("title must not be empty".to_string());
    }
    if !recurrence::is_valid_time(&payload.start_time) {
        errors.push(format!("start_time must be a valid HH:MM:SS time (got '{}')", payload.start_time));
    }
    if !recurrence::is_valid_time(&payload.end_time) {
        errors.push(format!("end_time must be a valid HH:MM:SS time (got '{}')", payload.end_time));
    }
    if let Err(e) = recurrence::validate_time_order(&payload.start_time, &payload.end_time) {
        errors.push(e);
    }

    let input = RecurrenceInput {
        pattern: payload.pattern.clone(),
        weekdays: payload.weekdays.clone(),
        start_date: payload.start_date.clone(),
        end_date: payload.end_date.clone(),
        max_occurrences: payload.max_occurrences,
    };
    let rule = match recurrence::validate(&input) {
        Ok(rule) => rule,
        Err(mut rule_errors) => {
            errors.append(&mut rule_errors);
            return Err(AppError::ValidationList(errors));
        }
    };
    if !errors.is_empty() {
        return Err(AppError::ValidationList(errors));
    }

    let weekdays = payload
        .weekdays
        .as_ref()
        .filter(|_| rule.pattern == RecurrencePattern::Weekly)
        .map(|days| recurrence::encode_weekdays(days));

    let event = MasterEvent {
        id: Uuid::new_v4().to_string(),
        bar_id: bar.id,
        title: payload.title,
        description: payload.description,
        image_url: payload.image_url,
        external_link: payload.external_link,
        event_tag_id: payload.event_tag_id,
        crosses_midnight: recurrence::crosses_midnight(&payload.start_time, &payload.end_time),
        start_time: payload.start_time,
        end_time: payload.end_time,
        pattern: rule.pattern.as_str().to_string(),
        weekdays,
        start_date: rule.start_date,
        end_date: rule.end_date,
        max_occurrences: rule.max_occurrences,
        is_active: true,
        created_at: Utc::now(),
    };

    let dates = recurrence::generate(&rule);
    let instances = scheduler::materialize(&event, &dates);

    let created = state.event_repo.create_with_instances(&event, &instances).await?;
    info!("Event created: {} with {} instances", created.id, instances.len());
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Path(bar_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.bar_repo.find_by_id(&bar_id).await?.is_none() {
        return Err(AppError::NotFound("Bar not found".into()));
    }

    let events = state.event_repo.list_by_bar(&bar_id).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if let Some(tag_id) = &payload.event_tag_id {
        if !state.tag_repo.exists(tag_id).await? {
            return Err(AppError::NotFound("Tag not found".into()));
        }
    }

    // one "today" for the whole edit: the regeneration window, the override
    // resets and the cancellation sweep must agree on where the past ends
    let today = state.clock.today();
    let patch = EventPatch::from(payload);

    let (updated, plan) = scheduler::plan_update(&event, &patch, today)
        .map_err(AppError::ValidationList)?;

    let saved = state.event_repo.apply_update(&updated, &plan).await?;
    info!("Event updated: {} (regenerated: {})", event_id, plan.regenerated.is_some());
    Ok(Json(saved))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_repo.deactivate(&event_id).await?;
    info!("Event deactivated: {}", event_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
