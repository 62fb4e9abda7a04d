//! Subscription service

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{NewSubscription, Subscription, SubscriptionPlan};
use crate::repositories::SubscriptionRepository;

/// Error types for subscription operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Subscription request payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionInput {
    pub user_id: Uuid,
    pub plan: String,
}

/// Subscription service
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repo }
    }

    /// Create an active subscription starting now. The plan string must be
    /// one of the known plans.
    pub async fn create(
        &self,
        input: CreateSubscriptionInput,
    ) -> Result<Subscription, SubscriptionServiceError> {
        let plan = SubscriptionPlan::parse(&input.plan).ok_or_else(|| {
            SubscriptionServiceError::ValidationError(format!("unknown plan: {}", input.plan))
        })?;

        let row = NewSubscription {
            user_id: input.user_id,
            plan,
            status: "active".to_string(),
            start_date: Utc::now(),
        };
        Ok(self.repo.insert(&row).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemorySubscriptionRepo;

    #[tokio::test]
    async fn rejects_unknown_plan() {
        let service = SubscriptionService::new(Arc::new(InMemorySubscriptionRepo::default()));
        let err = service
            .create(CreateSubscriptionInput {
                user_id: Uuid::new_v4(),
                plan: "weekly".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn creates_active_subscription() {
        let service = SubscriptionService::new(Arc::new(InMemorySubscriptionRepo::default()));
        let sub = service
            .create(CreateSubscriptionInput {
                user_id: Uuid::new_v4(),
                plan: "monthly".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(sub.plan, SubscriptionPlan::Monthly);
        assert_eq!(sub.status, "active");
    }
}
