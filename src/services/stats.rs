//! Visit statistics and the admin dashboard summary

use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::DashboardSummary;
use crate::repositories::{
    ArticleRepository, CategoryRepository, CommentRepository, StatsRepository, TagRepository,
};

/// Days of visit history shown on the dashboard
const DASHBOARD_VISIT_DAYS: i64 = 7;

/// Visit beacon payload from the public site
#[derive(Debug, Clone, Deserialize)]
pub struct RecordVisitInput {
    pub page_path: String,
    #[serde(default)]
    pub article_id: Option<i64>,
}

/// Stats service
pub struct StatsService {
    stats: Arc<dyn StatsRepository>,
    articles: Arc<dyn ArticleRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl StatsService {
    pub fn new(
        stats: Arc<dyn StatsRepository>,
        articles: Arc<dyn ArticleRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            stats,
            articles,
            categories,
            tags,
            comments,
        }
    }

    /// Record a visit for today. The backend stored procedure handles the
    /// increment-or-insert race.
    pub async fn record_visit(&self, input: RecordVisitInput) -> anyhow::Result<()> {
        let today = Utc::now().date_naive();
        self.stats
            .record_visit(today, &input.page_path, input.article_id)
            .await
    }

    /// Aggregate counts plus recent visit rows for the admin dashboard.
    /// The six backend queries are independent and run concurrently.
    pub async fn dashboard(&self) -> anyhow::Result<DashboardSummary> {
        let since = Utc::now().date_naive() - Duration::days(DASHBOARD_VISIT_DAYS);
        let (
            total_articles,
            published_articles,
            total_categories,
            total_tags,
            pending_comments,
            recent_visits,
        ) = futures::try_join!(
            self.articles.count(),
            self.articles.count_published(),
            self.categories.count(),
            self.tags.count(),
            self.comments.count_pending(),
            self.stats.visits_since(since),
        )?;
        Ok(DashboardSummary {
            total_articles,
            published_articles,
            total_categories,
            total_tags,
            pending_comments,
            recent_visits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        InMemoryArticleRepo, InMemoryCategoryRepo, InMemoryCommentRepo, InMemoryStatsRepo,
        InMemoryTagRepo,
    };

    #[tokio::test]
    async fn record_visit_targets_today() {
        let stats = Arc::new(InMemoryStatsRepo::default());
        let service = StatsService::new(
            stats.clone(),
            Arc::new(InMemoryArticleRepo::default()),
            Arc::new(InMemoryCategoryRepo::default()),
            Arc::new(InMemoryTagRepo::default()),
            Arc::new(InMemoryCommentRepo::default()),
        );

        service
            .record_visit(RecordVisitInput {
                page_path: "/articles/hello".to_string(),
                article_id: Some(3),
            })
            .await
            .unwrap();

        let recorded = stats.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].1, "/articles/hello");
        assert_eq!(recorded[0].0, Utc::now().date_naive());
    }
}
