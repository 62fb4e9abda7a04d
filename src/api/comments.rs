//! Comment API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::Comment;
use crate::services::CreateCommentInput;

/// GET /comments/{article_id} - approved comments, oldest first
pub async fn get_comments(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(state.comment_service.list_approved(article_id).await?))
}

/// POST /comments - submit a comment for moderation
pub async fn create_comment(
    State(state): State<AppState>,
    Json(input): Json<CreateCommentInput>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.comment_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
