use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateBarRequest, UpdateBarRequest};
use crate::domain::models::bar::Bar;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_bar(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBarRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }

    let mut bar = Bar::new(payload.name, payload.address, payload.city);
    bar.latitude = payload.latitude;
    bar.longitude = payload.longitude;
    bar.description = payload.description;
    bar.website = payload.website;

    let created = state.bar_repo.create(&bar).await?;
    info!("Bar created: {} ({})", created.name, created.id);
    Ok(Json(created))
}

pub async fn list_bars(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let bars = state.bar_repo.list().await?;
    Ok(Json(bars))
}

pub async fn get_bar(
    State(state): State<Arc<AppState>>,
    Path(bar_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bar = state.bar_repo.find_by_id(&bar_id).await?
        .ok_or(AppError::NotFound("Bar not found".into()))?;
    Ok(Json(bar))
}

pub async fn update_bar(
    State(state): State<Arc<AppState>>,
    Path(bar_id): Path<String>,
    Json(payload): Json<UpdateBarRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut bar = state.bar_repo.find_by_id(&bar_id).await?
        .ok_or(AppError::NotFound("Bar not found".into()))?;

    if let Some(val) = payload.name { bar.name = val; }
    if let Some(val) = payload.address { bar.address = val; }
    if let Some(val) = payload.city { bar.city = val; }
    if let Some(val) = payload.latitude { bar.latitude = Some(val); }
    if let Some(val) = payload.longitude { bar.longitude = Some(val); }
    if let Some(val) = payload.description { bar.description = Some(val); }
    if let Some(val) = payload.website { bar.website = Some(val); }

    let updated = state.bar_repo.update(&bar).await?;
    info!("Bar updated: {}", bar_id);
    Ok(Json(updated))
}

pub async fn delete_bar(
    State(state): State<Arc<AppState>>,
    Path(bar_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.bar_repo.deactivate(&bar_id).await?;
    info!("Bar deactivated: {}", bar_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
