//! Article model
//!
//! This module provides:
//! - `Article` entity representing a published or unpublished article row
//! - Input types for creating and updating articles
//! - `ArticleFilter` describing composed list filters
//! - Pagination types for list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::taxonomy::{Category, Tag};

/// Article entity as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// Article title
    pub title: String,
    /// URL-friendly slug, unique across articles
    pub slug: String,
    /// HTML content
    pub content: String,
    /// Optional short excerpt for list views
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Featured image URL
    #[serde(default)]
    pub featured_image: Option<String>,
    /// Category reference
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Author reference (backend user UUID)
    #[serde(default)]
    pub author_id: Option<Uuid>,
    /// Whether the article is publicly visible
    pub published: bool,
    /// Publication timestamp
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Article decorated with its category row and tag list.
///
/// Lists and detail responses carry this shape; the tag list comes from one
/// batched join-table query per page, not one query per article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleWithMeta {
    #[serde(flatten)]
    pub article: Article,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Insert payload for a new article row
#[derive(Debug, Clone, Serialize)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub category_id: i64,
    pub author_id: Uuid,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update payload for an existing article row.
///
/// Only set fields are serialized, so unset fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ArticleChanges {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.slug.is_some()
            || self.content.is_some()
            || self.excerpt.is_some()
            || self.featured_image.is_some()
            || self.category_id.is_some()
            || self.published.is_some()
            || self.published_at.is_some()
    }
}

/// Composed list filters, all applied at the storage layer before the page
/// window is computed.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Restrict to published articles (public listings)
    pub published_only: bool,
    /// Equality filter on category
    pub category_id: Option<i64>,
    /// Case-insensitive substring match across title and content
    pub search: Option<String>,
    /// Restrict to this id set (tag filter resolved via the join table)
    pub id_set: Option<Vec<i64>>,
}

/// Pagination parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self { page: 1, per_page: 10 }
    }
}

impl ListParams {
    /// Create new pagination parameters
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Calculate the offset for backend queries
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1)) as i64 * self.per_page as i64
    }

    /// Get the limit for backend queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
    /// Total number of pages for this window size
    pub total_pages: u32,
    /// Whether a further page exists beyond this one
    pub has_next: bool,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        let total_pages = if params.per_page == 0 {
            0
        } else {
            u32::try_from((total.max(0) + params.per_page as i64 - 1) / params.per_page as i64)
                .unwrap_or(u32::MAX)
        };
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
            total_pages,
            has_next: params.page < total_pages,
        }
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items in the current page
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            per_page: 10,
            total_pages: 0,
            has_next: false,
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn pages_cover_disjoint_windows(page in 1u32..1000, per_page in 1u32..=100) {
            let a = ListParams::new(page, per_page);
            let b = ListParams::new(page + 1, per_page);
            prop_assert_eq!(a.offset() + a.limit(), b.offset());
        }

        #[test]
        fn per_page_always_within_bounds(page in any::<u32>(), per_page in any::<u32>()) {
            let params = ListParams::new(page, per_page);
            prop_assert!(params.per_page >= 1 && params.per_page <= 100);
            prop_assert!(params.page >= 1);
        }
    }
}
