//! Subscription model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Monthly => "monthly",
            SubscriptionPlan::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monthly" => Some(SubscriptionPlan::Monthly),
            "yearly" => Some(SubscriptionPlan::Yearly),
            _ => None,
        }
    }
}

/// Subscription row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: Uuid,
    pub plan: SubscriptionPlan,
    pub status: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a subscription signup
#[derive(Debug, Clone, Serialize)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub plan: SubscriptionPlan,
    pub status: String,
    pub start_date: DateTime<Utc>,
}
