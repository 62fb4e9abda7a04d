//! Visit statistics and dashboard models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily visit counter row, incremented by a remote stored procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitStatistic {
    pub id: i64,
    pub date: NaiveDate,
    pub page_path: String,
    #[serde(default)]
    pub article_id: Option<i64>,
    pub visitor_count: i64,
    #[serde(default)]
    pub unique_visitors: i64,
}

/// Aggregate counts for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_articles: i64,
    pub published_articles: i64,
    pub total_categories: i64,
    pub total_tags: i64,
    pub pending_comments: i64,
    /// Daily visit rows for the trailing window, newest first
    pub recent_visits: Vec<VisitStatistic>,
}
