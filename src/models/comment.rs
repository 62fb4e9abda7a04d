//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    pub content: String,
    /// New comments await moderation before showing up publicly
    pub is_approved: bool,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new comment.
///
/// The approval flag is left to the backend's column default (unapproved).
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub article_id: i64,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}
