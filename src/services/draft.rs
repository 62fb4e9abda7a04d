//! Draft service
//!
//! Drafts are loose scratch rows: every field optional, saved manually or by
//! the editor's autosave. Conversion to an article goes through the article
//! service; the draft row is deleted explicitly afterwards.

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{Draft, DraftChanges, NewDraft};
use crate::repositories::DraftRepository;

/// Error types for draft service operations
#[derive(Debug, thiserror::Error)]
pub enum DraftServiceError {
    /// Draft not found
    #[error("Draft not found: {0}")]
    NotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Payload for saving a new draft
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveDraftInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub is_autosave: bool,
}

/// Payload for updating an existing draft
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDraftInput {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Draft service
pub struct DraftService {
    repo: Arc<dyn DraftRepository>,
}

impl DraftService {
    pub fn new(repo: Arc<dyn DraftRepository>) -> Self {
        Self { repo }
    }

    /// All drafts, most recently updated first
    pub async fn list(&self) -> Result<Vec<Draft>, DraftServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Draft, DraftServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(DraftServiceError::NotFound(id))
    }

    /// Save a new draft for the signed-in author
    pub async fn save(
        &self,
        input: SaveDraftInput,
        author_id: Uuid,
    ) -> Result<Draft, DraftServiceError> {
        let row = NewDraft {
            title: input.title,
            content: input.content,
            category_id: input.category_id,
            author_id,
            is_autosave: input.is_autosave,
            updated_at: Utc::now(),
        };
        Ok(self.repo.insert(&row).await?)
    }

    /// Update a draft in place, bumping its timestamp
    pub async fn update(&self, input: UpdateDraftInput) -> Result<Draft, DraftServiceError> {
        let id = input.id;
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(DraftServiceError::NotFound(id))?;

        let changes = DraftChanges {
            title: input.title,
            content: input.content,
            category_id: input.category_id,
            is_autosave: None,
            updated_at: Some(Utc::now()),
        };
        self.repo.update(id, &changes).await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DraftServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(DraftServiceError::NotFound(id))?;
        self.repo.delete(id).await?;
        Ok(())
    }
}
