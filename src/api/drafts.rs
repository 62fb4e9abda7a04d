//! Draft API endpoints (admin only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::models::Draft;
use crate::services::{SaveDraftInput, UpdateDraftInput};

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

/// GET /drafts
pub async fn list_drafts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Draft>>, ApiError> {
    Ok(Json(state.draft_service.list().await?))
}

/// GET /drafts/{id}
pub async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Draft>, ApiError> {
    Ok(Json(state.draft_service.get(id).await?))
}

/// POST /drafts - save a new draft for the signed-in admin
pub async fn save_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(input): Json<SaveDraftInput>,
) -> Result<(StatusCode, Json<Draft>), ApiError> {
    let draft = state.draft_service.save(input, session.subject).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// PUT /drafts - update by body id
pub async fn update_draft(
    State(state): State<AppState>,
    Json(input): Json<UpdateDraftInput>,
) -> Result<Json<Draft>, ApiError> {
    Ok(Json(state.draft_service.update(input).await?))
}

/// DELETE /drafts?id=
pub async fn delete_draft(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, ApiError> {
    state.draft_service.delete(query.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
