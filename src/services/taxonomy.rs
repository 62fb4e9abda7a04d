//! Category and tag services

use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Category, NewTag, Tag};
use crate::repositories::{CategoryRepository, TagRepository};

/// Error types for tag service operations
#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Payload for creating a tag
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Read-only category listing
pub struct TaxonomyService {
    categories: Arc<dyn CategoryRepository>,
}

impl TaxonomyService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        self.categories.list().await
    }
}

/// Tag listing and creation
pub struct TagService {
    tags: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        Ok(self.tags.list().await?)
    }

    pub async fn create(&self, input: CreateTagInput) -> Result<Tag, TagServiceError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(TagServiceError::ValidationError(
                "name is required".to_string(),
            ));
        }
        let row = NewTag {
            name: name.to_string(),
            description: input.description,
        };
        Ok(self.tags.create(&row).await?)
    }
}
