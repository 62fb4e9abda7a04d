//! Subscription API endpoint

use axum::{extract::State, http::StatusCode, Json};

use crate::api::middleware::{ApiError, AppState};
use crate::models::Subscription;
use crate::services::CreateSubscriptionInput;

/// POST /subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(input): Json<CreateSubscriptionInput>,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    let subscription = state.subscription_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}
