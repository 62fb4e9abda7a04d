//! Subscription repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{NewSubscription, Subscription};
use crate::supabase::Supabase;

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a subscription row
    async fn insert(&self, subscription: &NewSubscription) -> Result<Subscription>;
}

/// PostgREST-backed subscription repository
pub struct PostgrestSubscriptionRepository {
    client: Supabase,
}

impl PostgrestSubscriptionRepository {
    pub fn new(client: Supabase) -> Self {
        Self { client }
    }

    pub fn boxed(client: Supabase) -> Arc<dyn SubscriptionRepository> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl SubscriptionRepository for PostgrestSubscriptionRepository {
    async fn insert(&self, subscription: &NewSubscription) -> Result<Subscription> {
        self.client
            .from("subscriptions")
            .insert_returning(subscription)
            .await
            .context("failed to create subscription")
    }
}
