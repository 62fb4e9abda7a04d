//! Draft repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{Draft, DraftChanges, NewDraft};
use crate::supabase::Supabase;

/// Draft repository trait
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// All drafts, most recently updated first
    async fn list(&self) -> Result<Vec<Draft>>;

    /// Get draft by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Draft>>;

    /// Insert a new draft
    async fn insert(&self, draft: &NewDraft) -> Result<Draft>;

    /// Patch an existing draft
    async fn update(&self, id: i64, changes: &DraftChanges) -> Result<()>;

    /// Delete a draft (after manual conversion, or explicit discard)
    async fn delete(&self, id: i64) -> Result<()>;
}

/// PostgREST-backed draft repository
pub struct PostgrestDraftRepository {
    client: Supabase,
}

impl PostgrestDraftRepository {
    pub fn new(client: Supabase) -> Self {
        Self { client }
    }

    pub fn boxed(client: Supabase) -> Arc<dyn DraftRepository> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl DraftRepository for PostgrestDraftRepository {
    async fn list(&self) -> Result<Vec<Draft>> {
        self.client
            .from("drafts")
            .select("*")
            .order("updated_at.desc")
            .fetch()
            .await
            .context("failed to list drafts")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Draft>> {
        self.client
            .from("drafts")
            .select("*")
            .eq("id", id)
            .fetch_optional()
            .await
            .context("failed to get draft")
    }

    async fn insert(&self, draft: &NewDraft) -> Result<Draft> {
        self.client
            .from("drafts")
            .insert_returning(draft)
            .await
            .context("failed to save draft")
    }

    async fn update(&self, id: i64, changes: &DraftChanges) -> Result<()> {
        self.client
            .from("drafts")
            .eq("id", id)
            .update(changes)
            .await
            .context("failed to update draft")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .from("drafts")
            .eq("id", id)
            .delete()
            .await
            .context("failed to delete draft")
    }
}
