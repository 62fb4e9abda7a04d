//! Upload API endpoint (admin only)
//!
//! Accepts multipart/form-data with a single file field named "file" and
//! hands it to the upload service, which validates before anything reaches
//! object storage.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Extension, Json,
};

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::services::UploadedFile;

/// POST /upload
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedFile>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Failed to read multipart: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation_error(format!("Failed to read file: {e}")))?;

        let uploaded = state
            .upload_service
            .upload(&file_name, &content_type, data.to_vec(), session.subject)
            .await?;
        return Ok((StatusCode::CREATED, Json(uploaded)));
    }

    Err(ApiError::validation_error("Missing file field"))
}
