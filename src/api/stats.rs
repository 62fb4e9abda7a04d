//! Visit statistics and dashboard endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::api::middleware::{ApiError, AppState};
use crate::models::DashboardSummary;
use crate::services::RecordVisitInput;

/// POST /visits - public visit beacon
pub async fn record_visit(
    State(state): State<AppState>,
    Json(input): Json<RecordVisitInput>,
) -> Result<StatusCode, ApiError> {
    state.stats_service.record_visit(input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/dashboard - aggregate counts and recent visits
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, ApiError> {
    Ok(Json(state.stats_service.dashboard().await?))
}
