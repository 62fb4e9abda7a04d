//! Category and tag repositories
//!
//! Tag lookups for list pages are batched: one join-table query keyed by the
//! page's article ids replaces the per-article round-trip.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Category, NewTag, Tag};
use crate::supabase::Supabase;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List all categories ordered by name
    async fn list(&self) -> Result<Vec<Category>>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Count categories
    async fn count(&self) -> Result<i64>;
}

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List all tags ordered by name
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Create a tag
    async fn create(&self, tag: &NewTag) -> Result<Tag>;

    /// Count tags
    async fn count(&self) -> Result<i64>;

    /// Tag ids currently attached to an article
    async fn ids_for_article(&self, article_id: i64) -> Result<Vec<i64>>;

    /// Article ids carrying a tag (input to the pre-pagination id filter)
    async fn article_ids_with_tag(&self, tag_id: i64) -> Result<Vec<i64>>;

    /// Tags for a whole page of articles, in one batched query
    async fn tags_for_articles(&self, article_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>>;

    /// Attach a tag to an article
    async fn attach(&self, article_id: i64, tag_id: i64) -> Result<()>;

    /// Detach a tag from an article
    async fn detach(&self, article_id: i64, tag_id: i64) -> Result<()>;
}

/// PostgREST-backed category repository
pub struct PostgrestCategoryRepository {
    client: Supabase,
}

impl PostgrestCategoryRepository {
    pub fn new(client: Supabase) -> Self {
        Self { client }
    }

    pub fn boxed(client: Supabase) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl CategoryRepository for PostgrestCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        self.client
            .from("categories")
            .select("*")
            .order("name.asc")
            .fetch()
            .await
            .context("failed to list categories")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        self.client
            .from("categories")
            .select("*")
            .eq("id", id)
            .fetch_optional()
            .await
            .context("failed to get category")
    }

    async fn count(&self) -> Result<i64> {
        self.client
            .from("categories")
            .count()
            .await
            .context("failed to count categories")
    }
}

#[derive(Debug, Deserialize)]
struct TagIdRow {
    tag_id: i64,
}

#[derive(Debug, Deserialize)]
struct ArticleIdRow {
    article_id: i64,
}

#[derive(Debug, Deserialize)]
struct ArticleTagRow {
    article_id: i64,
    tag: Tag,
}

#[derive(serde::Serialize)]
struct ArticleTagInsert {
    article_id: i64,
    tag_id: i64,
}

/// PostgREST-backed tag repository
pub struct PostgrestTagRepository {
    client: Supabase,
}

impl PostgrestTagRepository {
    pub fn new(client: Supabase) -> Self {
        Self { client }
    }

    pub fn boxed(client: Supabase) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl TagRepository for PostgrestTagRepository {
    async fn list(&self) -> Result<Vec<Tag>> {
        self.client
            .from("tags")
            .select("*")
            .order("name.asc")
            .fetch()
            .await
            .context("failed to list tags")
    }

    async fn create(&self, tag: &NewTag) -> Result<Tag> {
        self.client
            .from("tags")
            .insert_returning(tag)
            .await
            .context("failed to create tag")
    }

    async fn count(&self) -> Result<i64> {
        self.client
            .from("tags")
            .count()
            .await
            .context("failed to count tags")
    }

    async fn ids_for_article(&self, article_id: i64) -> Result<Vec<i64>> {
        let rows: Vec<TagIdRow> = self
            .client
            .from("article_tags")
            .select("tag_id")
            .eq("article_id", article_id)
            .fetch()
            .await
            .context("failed to fetch article tag ids")?;
        Ok(rows.into_iter().map(|r| r.tag_id).collect())
    }

    async fn article_ids_with_tag(&self, tag_id: i64) -> Result<Vec<i64>> {
        let rows: Vec<ArticleIdRow> = self
            .client
            .from("article_tags")
            .select("article_id")
            .eq("tag_id", tag_id)
            .fetch()
            .await
            .context("failed to fetch tagged article ids")?;
        Ok(rows.into_iter().map(|r| r.article_id).collect())
    }

    async fn tags_for_articles(&self, article_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>> {
        if article_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<ArticleTagRow> = self
            .client
            .from("article_tags")
            .select("article_id,tag:tag_id(*)")
            .in_ids("article_id", article_ids)
            .fetch()
            .await
            .context("failed to batch-fetch article tags")?;
        let mut map: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in rows {
            map.entry(row.article_id).or_default().push(row.tag);
        }
        Ok(map)
    }

    async fn attach(&self, article_id: i64, tag_id: i64) -> Result<()> {
        self.client
            .from("article_tags")
            .insert(&ArticleTagInsert { article_id, tag_id })
            .await
            .context("failed to attach tag")
    }

    async fn detach(&self, article_id: i64, tag_id: i64) -> Result<()> {
        self.client
            .from("article_tags")
            .eq("article_id", article_id)
            .eq("tag_id", tag_id)
            .delete()
            .await
            .context("failed to detach tag")
    }
}
