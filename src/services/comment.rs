//! Comment service
//!
//! Public readers see approved comments only; submissions land unapproved
//! and wait for moderation on the backend.

use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Comment, NewComment};
use crate::repositories::CommentRepository;

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Comment submission payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentInput {
    pub article_id: i64,
    pub author_name: String,
    #[serde(default)]
    pub author_email: Option<String>,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Comment service
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>) -> Self {
        Self { repo }
    }

    /// Approved comments for an article, oldest first
    pub async fn list_approved(
        &self,
        article_id: i64,
    ) -> Result<Vec<Comment>, CommentServiceError> {
        Ok(self.repo.list_approved(article_id).await?)
    }

    /// Submit a comment. Approval is left to the backend column default.
    pub async fn create(
        &self,
        input: CreateCommentInput,
    ) -> Result<Comment, CommentServiceError> {
        let author_name = input.author_name.trim();
        if author_name.is_empty() {
            return Err(CommentServiceError::ValidationError(
                "author_name is required".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(CommentServiceError::ValidationError(
                "content is required".to_string(),
            ));
        }

        let row = NewComment {
            article_id: input.article_id,
            author_name: author_name.to_string(),
            author_email: input
                .author_email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            content: input.content,
            parent_id: input.parent_id,
        };
        Ok(self.repo.insert(&row).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryCommentRepo;

    fn input() -> CreateCommentInput {
        CreateCommentInput {
            article_id: 1,
            author_name: "Reader".to_string(),
            author_email: Some("reader@example.com".to_string()),
            content: "Nice post".to_string(),
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn create_requires_name_and_content() {
        let service = CommentService::new(Arc::new(InMemoryCommentRepo::default()));

        let mut bad = input();
        bad.author_name = " ".to_string();
        assert!(matches!(
            service.create(bad).await.unwrap_err(),
            CommentServiceError::ValidationError(_)
        ));

        let mut bad = input();
        bad.content = String::new();
        assert!(matches!(
            service.create(bad).await.unwrap_err(),
            CommentServiceError::ValidationError(_)
        ));
    }

    #[tokio::test]
    async fn new_comments_await_moderation() {
        let repo = Arc::new(InMemoryCommentRepo::default());
        let service = CommentService::new(repo.clone());

        let comment = service.create(input()).await.unwrap();
        assert!(!comment.is_approved);
        // unapproved comments stay off the public list
        assert!(service.list_approved(1).await.unwrap().is_empty());
    }
}
