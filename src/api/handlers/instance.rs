use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::UpdateInstanceRequest;
use crate::domain::services::{overrides, scheduler};
use crate::domain::services::recurrence::DATE_FORMAT;
use crate::domain::services::scheduler::InstancePatch;
use crate::error::AppError;
use std::sync::Arc;
use std::collections::HashMap;
use chrono::NaiveDate;
use tracing::info;

fn parse_date_param(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<NaiveDate>, AppError> {
    match params.get(key) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid {} date", key))),
    }
}

pub async fn list_instances(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let from = parse_date_param(&params, "from")?;
    let to = parse_date_param(&params, "to")?;
    let include_cancelled = params
        .get("include_cancelled")
        .map(|v| v == "true")
        .unwrap_or(false);

    let instances = state
        .instance_repo
        .list_by_event(&event.id, from, to, include_cancelled)
        .await?;

    let effective: Vec<_> = instances
        .iter()
        .map(|instance| overrides::resolve(&event, instance))
        .collect();

    Ok(Json(effective))
}

pub async fn get_instance(
    State(state): State<Arc<AppState>>,
    Path(instance_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let instance = state.instance_repo.find_by_id(&instance_id).await?
        .ok_or(AppError::NotFound("Instance not found".into()))?;
    let event = state.event_repo.find_by_id(&instance.event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(Json(overrides::resolve(&event, &instance)))
}

pub async fn update_instance(
    State(state): State<Arc<AppState>>,
    Path(instance_id): Path<String>,
    Json(payload): Json<UpdateInstanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let instance = state.instance_repo.find_by_id(&instance_id).await?
        .ok_or(AppError::NotFound("Instance not found".into()))?;
    let event = state.event_repo.find_by_id(&instance.event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let patch = InstancePatch::from(payload);
    let tag_changed = patch.is_tag_edit();

    let updated = scheduler::plan_instance_edit(&event, &instance, &patch)
        .map_err(AppError::ValidationList)?;

    if tag_changed {
        if let Some(tag_id) = &updated.custom_tag_id {
            if !state.tag_repo.exists(tag_id).await? {
                return Err(AppError::NotFound("Tag not found".into()));
            }
        }
    }

    let saved = state.instance_repo.update(&updated).await?;
    info!("Instance updated: {} ({})", instance_id, saved.date);
    Ok(Json(overrides::resolve(&event, &saved)))
}
