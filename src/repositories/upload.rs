//! Upload audit repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::models::UploadRecord;
use crate::supabase::Supabase;

/// Upload audit repository trait
#[async_trait]
pub trait UploadRepository: Send + Sync {
    /// Record an upload for auditing
    async fn insert(&self, record: &UploadRecord) -> Result<()>;
}

/// PostgREST-backed upload audit repository
pub struct PostgrestUploadRepository {
    client: Supabase,
}

impl PostgrestUploadRepository {
    pub fn new(client: Supabase) -> Self {
        Self { client }
    }

    pub fn boxed(client: Supabase) -> Arc<dyn UploadRepository> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl UploadRepository for PostgrestUploadRepository {
    async fn insert(&self, record: &UploadRecord) -> Result<()> {
        self.client
            .from("uploads")
            .insert(record)
            .await
            .context("failed to record upload")
    }
}
