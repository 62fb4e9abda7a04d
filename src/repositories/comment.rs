//! Comment repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{Comment, NewComment};
use crate::supabase::Supabase;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Approved comments for an article, oldest first
    async fn list_approved(&self, article_id: i64) -> Result<Vec<Comment>>;

    /// Insert a comment (unapproved until moderated)
    async fn insert(&self, comment: &NewComment) -> Result<Comment>;

    /// Count comments awaiting moderation
    async fn count_pending(&self) -> Result<i64>;
}

/// PostgREST-backed comment repository
pub struct PostgrestCommentRepository {
    client: Supabase,
}

impl PostgrestCommentRepository {
    pub fn new(client: Supabase) -> Self {
        Self { client }
    }

    pub fn boxed(client: Supabase) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl CommentRepository for PostgrestCommentRepository {
    async fn list_approved(&self, article_id: i64) -> Result<Vec<Comment>> {
        self.client
            .from("comments")
            .select("*")
            .eq("article_id", article_id)
            .eq("is_approved", true)
            .order("created_at.asc")
            .fetch()
            .await
            .context("failed to list comments")
    }

    async fn insert(&self, comment: &NewComment) -> Result<Comment> {
        self.client
            .from("comments")
            .insert_returning(comment)
            .await
            .context("failed to create comment")
    }

    async fn count_pending(&self) -> Result<i64> {
        self.client
            .from("comments")
            .eq("is_approved", false)
            .count()
            .await
            .context("failed to count pending comments")
    }
}
