//! Blog settings API endpoint

use axum::{extract::State, Json};
use serde_json::{Map, Value};

use crate::api::middleware::{ApiError, AppState};

/// GET /settings - all settings as a flat key/value object
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    Ok(Json(state.settings_service.as_map().await?))
}
