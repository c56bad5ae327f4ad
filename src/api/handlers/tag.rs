use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateTagRequest;
use crate::domain::models::tag::Tag;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }

    let tag = Tag::new(payload.name.trim().to_string());
    let created = state.tag_repo.create(&tag).await?;
    info!("Tag created: {} ({})", created.name, created.id);
    Ok(Json(created))
}

pub async fn list_tags(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let tags = state.tag_repo.list().await?;
    Ok(Json(tags))
}

pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    Path(tag_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.tag_repo.delete(&tag_id).await?;
    info!("Tag deleted: {}", tag_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
