//! Article repository
//!
//! Backend operations for articles. Listing composes every filter
//! (published flag, category, text query, candidate id set) into one
//! PostgREST query so the page window is computed after filtering, and the
//! category row rides along as an embedded resource.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Article, ArticleChanges, ArticleFilter, Category, NewArticle};
use crate::supabase::Supabase;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article row
    async fn insert(&self, row: &NewArticle) -> Result<Article>;

    /// Patch an article row and return the stored result
    async fn update(&self, id: i64, changes: &ArticleChanges) -> Result<Article>;

    /// Delete an article (associations cascade on the backend)
    async fn delete(&self, id: i64) -> Result<()>;

    /// Get article by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// Get article by slug, with its category row
    async fn get_by_slug(&self, slug: &str) -> Result<Option<(Article, Option<Category>)>>;

    /// Check if a slug already exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug exists on a different article (for updates)
    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool>;

    /// List articles with composed filters and an exact total
    async fn list(
        &self,
        filter: &ArticleFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<(Article, Option<Category>)>, i64)>;

    /// Count all articles
    async fn count(&self) -> Result<i64>;

    /// Count published articles
    async fn count_published(&self) -> Result<i64>;
}

/// Article row with its embedded category resource
#[derive(Debug, Deserialize)]
struct ArticleRow {
    #[serde(flatten)]
    article: Article,
    #[serde(default)]
    category: Option<Category>,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    #[allow(dead_code)]
    id: i64,
}

const ARTICLE_COLUMNS: &str = "*,category:category_id(*)";

/// PostgREST-backed article repository
pub struct PostgrestArticleRepository {
    client: Supabase,
}

impl PostgrestArticleRepository {
    pub fn new(client: Supabase) -> Self {
        Self { client }
    }

    pub fn boxed(client: Supabase) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl ArticleRepository for PostgrestArticleRepository {
    async fn insert(&self, row: &NewArticle) -> Result<Article> {
        self.client
            .from("articles")
            .insert_returning(row)
            .await
            .context("failed to insert article")
    }

    async fn update(&self, id: i64, changes: &ArticleChanges) -> Result<Article> {
        self.client
            .from("articles")
            .eq("id", id)
            .update_returning(changes)
            .await
            .context("failed to update article")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .from("articles")
            .eq("id", id)
            .delete()
            .await
            .context("failed to delete article")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        self.client
            .from("articles")
            .select("*")
            .eq("id", id)
            .fetch_optional()
            .await
            .context("failed to get article by id")
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<(Article, Option<Category>)>> {
        let row: Option<ArticleRow> = self
            .client
            .from("articles")
            .select(ARTICLE_COLUMNS)
            .eq("slug", slug)
            .fetch_optional()
            .await
            .context("failed to get article by slug")?;
        Ok(row.map(|r| (r.article, r.category)))
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let rows: Vec<IdRow> = self
            .client
            .from("articles")
            .select("id")
            .eq("slug", slug)
            .limit(1)
            .fetch()
            .await
            .context("failed to check slug existence")?;
        Ok(!rows.is_empty())
    }

    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        let rows: Vec<IdRow> = self
            .client
            .from("articles")
            .select("id")
            .eq("slug", slug)
            .neq("id", exclude_id)
            .limit(1)
            .fetch()
            .await
            .context("failed to check slug existence")?;
        Ok(!rows.is_empty())
    }

    async fn list(
        &self,
        filter: &ArticleFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<(Article, Option<Category>)>, i64)> {
        let mut query = self.client.from("articles").select(ARTICLE_COLUMNS);

        if filter.published_only {
            query = query.eq("published", true).order("published_at.desc");
        } else {
            query = query.order("created_at.desc");
        }
        if let Some(category_id) = filter.category_id {
            query = query.eq("category_id", category_id);
        }
        if let Some(ref search) = filter.search {
            query = query.or_ilike(&["title", "content"], search);
        }
        if let Some(ref ids) = filter.id_set {
            query = query.in_ids("id", ids);
        }

        let (rows, total): (Vec<ArticleRow>, i64) = query
            .range(offset, limit)
            .fetch_with_count()
            .await
            .context("failed to list articles")?;
        Ok((
            rows.into_iter().map(|r| (r.article, r.category)).collect(),
            total,
        ))
    }

    async fn count(&self) -> Result<i64> {
        self.client
            .from("articles")
            .count()
            .await
            .context("failed to count articles")
    }

    async fn count_published(&self) -> Result<i64> {
        self.client
            .from("articles")
            .eq("published", true)
            .count()
            .await
            .context("failed to count published articles")
    }
}
