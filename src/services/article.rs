//! Article service
//!
//! Business rules for article management:
//! - validation of create/update payloads, including the slug format
//! - the asymmetric slug collision policy: creates are rejected with a
//!   conflict, updates keep going by renaming the slug with a timestamp
//!   suffix
//! - tag synchronization as a set diff against the join table
//! - the public list pipeline, where every filter narrows the query
//!   before the page window is applied

use anyhow::Context;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    Article, ArticleChanges, ArticleFilter, ArticleWithMeta, ListParams, NewArticle, PagedResult,
};
use crate::repositories::{ArticleRepository, TagRepository};

/// Lowercase alphanumeric groups joined by single hyphens
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug regex"));

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article not found
    #[error("Article not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate slug on create
    #[error("Article slug already exists: {0}")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Create payload accepted from the admin API
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleInput {
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
}

/// Update payload accepted from the admin API. Absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticleInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
}

/// Query parameters for the public article list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub tag_id: Option<i64>,
    #[serde(default)]
    pub search: Option<String>,
}

impl PublicListQuery {
    pub fn params(&self) -> ListParams {
        ListParams::new(self.page.unwrap_or(1), self.per_page.unwrap_or(10))
    }
}

/// Suffix appended to a slug that collides during an update: the last eight
/// digits of the unix millisecond clock.
fn collision_suffix(millis: i64) -> String {
    format!("{:08}", millis.rem_euclid(100_000_000))
}

/// Article service
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    tag_repo: Arc<dyn TagRepository>,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>, tag_repo: Arc<dyn TagRepository>) -> Self {
        Self { repo, tag_repo }
    }

    /// Create a new article.
    ///
    /// Required fields are title, slug, content, and category. A slug that is
    /// already taken rejects the whole request; nothing is written.
    pub async fn create(
        &self,
        input: CreateArticleInput,
        author_id: Uuid,
    ) -> Result<ArticleWithMeta, ArticleServiceError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "title is required".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "content is required".to_string(),
            ));
        }
        let slug = input.slug.trim();
        validate_slug(slug)?;
        let category_id = input.category_id.ok_or_else(|| {
            ArticleServiceError::ValidationError("category_id is required".to_string())
        })?;

        if self.repo.exists_by_slug(slug).await? {
            return Err(ArticleServiceError::DuplicateSlug(slug.to_string()));
        }

        let now = Utc::now();
        let row = NewArticle {
            title: title.to_string(),
            slug: slug.to_string(),
            content: input.content,
            excerpt: input.excerpt,
            featured_image: input.featured_image,
            category_id,
            author_id,
            published: input.published,
            published_at: input.published.then_some(now),
            created_at: now,
            updated_at: now,
        };
        let article = self.repo.insert(&row).await?;

        if let Some(ref tag_ids) = input.tag_ids {
            self.sync_tags(article.id, tag_ids).await;
        }
        self.decorate(article).await
    }

    /// Update an existing article.
    ///
    /// A slug that collides with another article does not fail the update:
    /// the incoming slug is renamed with a timestamp suffix instead.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateArticleInput,
    ) -> Result<ArticleWithMeta, ArticleServiceError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ArticleServiceError::NotFound(id.to_string()))?;

        let mut changes = ArticleChanges::default();

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(ArticleServiceError::ValidationError(
                    "title cannot be empty".to_string(),
                ));
            }
            changes.title = Some(title);
        }
        if let Some(content) = input.content {
            if content.trim().is_empty() {
                return Err(ArticleServiceError::ValidationError(
                    "content cannot be empty".to_string(),
                ));
            }
            changes.content = Some(content);
        }
        if let Some(slug) = input.slug {
            let slug = slug.trim().to_string();
            validate_slug(&slug)?;
            if slug != existing.slug && self.repo.exists_by_slug_excluding(&slug, id).await? {
                let renamed =
                    format!("{}-{}", slug, collision_suffix(Utc::now().timestamp_millis()));
                tracing::info!(article_id = id, slug = %slug, renamed = %renamed,
                    "slug collision on update, renaming");
                changes.slug = Some(renamed);
            } else {
                changes.slug = Some(slug);
            }
        }
        changes.excerpt = input.excerpt;
        changes.featured_image = input.featured_image;
        changes.category_id = input.category_id;

        let now = Utc::now();
        if let Some(published) = input.published {
            changes.published = Some(published);
            if published && !existing.published {
                changes.published_at = Some(now);
            }
        }
        // A payload that changes no fields (tag-only updates included) skips
        // the row write; the backend never sees an empty PATCH.
        let article = if changes.has_changes() {
            changes.updated_at = Some(now);
            self.repo.update(id, &changes).await?
        } else {
            existing
        };
        if let Some(ref tag_ids) = input.tag_ids {
            self.sync_tags(id, tag_ids).await;
        }
        self.decorate(article).await
    }

    /// Delete an article. Tag associations cascade on the backend.
    pub async fn delete(&self, id: i64) -> Result<(), ArticleServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ArticleServiceError::NotFound(id.to_string()))?;
        self.repo.delete(id).await?;
        Ok(())
    }

    /// Public article list: published only, with category, tag, and text
    /// filters all applied before pagination.
    pub async fn list_public(
        &self,
        query: &PublicListQuery,
    ) -> Result<PagedResult<ArticleWithMeta>, ArticleServiceError> {
        let params = query.params();
        let mut filter = ArticleFilter {
            published_only: true,
            category_id: query.category_id,
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            id_set: None,
        };

        if let Some(tag_id) = query.tag_id {
            let ids = self.tag_repo.article_ids_with_tag(tag_id).await?;
            if ids.is_empty() {
                return Ok(PagedResult::new(Vec::new(), 0, &params));
            }
            filter.id_set = Some(ids);
        }

        self.list_with_meta(&filter, &params).await
    }

    /// Admin article list: drafts included, newest first.
    pub async fn list_admin(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<ArticleWithMeta>, ArticleServiceError> {
        let filter = ArticleFilter::default();
        self.list_with_meta(&filter, params).await
    }

    /// Fetch a published article by slug, with category and tags.
    pub async fn get_published(&self, slug: &str) -> Result<ArticleWithMeta, ArticleServiceError> {
        let (article, category) = self
            .repo
            .get_by_slug(slug)
            .await?
            .filter(|(article, _)| article.published)
            .ok_or_else(|| ArticleServiceError::NotFound(slug.to_string()))?;
        let mut tags_by_article = self
            .tag_repo
            .tags_for_articles(&[article.id])
            .await
            .context("failed to fetch tags")?;
        let tags = tags_by_article.remove(&article.id).unwrap_or_default();
        Ok(ArticleWithMeta {
            article,
            category,
            tags,
        })
    }

    async fn list_with_meta(
        &self,
        filter: &ArticleFilter,
        params: &ListParams,
    ) -> Result<PagedResult<ArticleWithMeta>, ArticleServiceError> {
        let (rows, total) = self
            .repo
            .list(filter, params.offset(), params.limit())
            .await?;

        // One join-table query for the whole page.
        let ids: Vec<i64> = rows.iter().map(|(article, _)| article.id).collect();
        let mut tags_by_article = self
            .tag_repo
            .tags_for_articles(&ids)
            .await
            .context("failed to batch-fetch tags")?;

        let items = rows
            .into_iter()
            .map(|(article, category)| {
                let tags = tags_by_article.remove(&article.id).unwrap_or_default();
                ArticleWithMeta {
                    article,
                    category,
                    tags,
                }
            })
            .collect();
        Ok(PagedResult::new(items, total, params))
    }

    /// Bring the join table in line with the desired tag set. Attaches what
    /// is missing and detaches what was removed; existing rows are left
    /// alone, so readers never observe an article with no tags mid-sync.
    /// Association failures are logged, not rolled back.
    async fn sync_tags(&self, article_id: i64, desired: &[i64]) {
        let current: HashSet<i64> = match self.tag_repo.ids_for_article(article_id).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(err) => {
                tracing::warn!(article_id, error = %err, "failed to read current tags, skipping sync");
                return;
            }
        };
        let desired: HashSet<i64> = desired.iter().copied().collect();

        for &tag_id in desired.difference(&current) {
            if let Err(err) = self.tag_repo.attach(article_id, tag_id).await {
                tracing::warn!(article_id, tag_id, error = %err, "failed to attach tag");
            }
        }
        for &tag_id in current.difference(&desired) {
            if let Err(err) = self.tag_repo.detach(article_id, tag_id).await {
                tracing::warn!(article_id, tag_id, error = %err, "failed to detach tag");
            }
        }
    }

    async fn decorate(&self, article: Article) -> Result<ArticleWithMeta, ArticleServiceError> {
        let mut tags_by_article = self
            .tag_repo
            .tags_for_articles(&[article.id])
            .await
            .context("failed to fetch tags")?;
        let tags = tags_by_article.remove(&article.id).unwrap_or_default();
        Ok(ArticleWithMeta {
            article,
            category: None,
            tags,
        })
    }
}

fn validate_slug(slug: &str) -> Result<(), ArticleServiceError> {
    if slug.is_empty() {
        return Err(ArticleServiceError::ValidationError(
            "slug is required".to_string(),
        ));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(ArticleServiceError::ValidationError(format!(
            "invalid slug format: {slug}"
        )));
    }
    Ok(())
}
