//! Blog settings repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::models::BlogSetting;
use crate::supabase::Supabase;

/// Settings repository trait
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// All setting rows
    async fn list(&self) -> Result<Vec<BlogSetting>>;
}

/// PostgREST-backed settings repository
pub struct PostgrestSettingsRepository {
    client: Supabase,
}

impl PostgrestSettingsRepository {
    pub fn new(client: Supabase) -> Self {
        Self { client }
    }

    pub fn boxed(client: Supabase) -> Arc<dyn SettingsRepository> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl SettingsRepository for PostgrestSettingsRepository {
    async fn list(&self) -> Result<Vec<BlogSetting>> {
        self.client
            .from("blog_settings")
            .select("*")
            .fetch()
            .await
            .context("failed to list blog settings")
    }
}
