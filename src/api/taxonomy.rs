//! Category and tag API endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Category, Tag};
use crate::services::CreateTagInput;

/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.taxonomy_service.list_categories().await?))
}

/// GET /tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.tag_service.list().await?))
}

/// POST /tags - create a tag (admin)
pub async fn create_tag(
    State(state): State<AppState>,
    Json(input): Json<CreateTagInput>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let tag = state.tag_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}
