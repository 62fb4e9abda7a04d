//! Draft model
//!
//! A draft is an unpublished scratch copy of in-progress content, not a
//! version history of a published article. Conversion to an article is
//! driven by the admin UI: it creates the article and then deletes the
//! draft; no automatic promotion exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Draft entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub author_id: Option<Uuid>,
    /// Set by the editor's periodic autosave, as opposed to an explicit save
    #[serde(default)]
    pub is_autosave: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new draft
#[derive(Debug, Clone, Serialize)]
pub struct NewDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub author_id: Uuid,
    pub is_autosave: bool,
    pub updated_at: DateTime<Utc>,
}

/// Partial update payload for an existing draft
#[derive(Debug, Clone, Default, Serialize)]
pub struct DraftChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_autosave: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
