//! Health check endpoint
//!
//! Probes backend connectivity with a cheap count query against the
//! categories table, using the anon-tier client.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .probe
        .from("categories")
        .count()
        .await
        .map_err(|e| ApiError::internal_error(format!("Backend unreachable: {e}")))?;

    Ok(Json(HealthResponse {
        status: "ok",
        database: "reachable",
    }))
}
