//! Visit statistics repository
//!
//! Visit recording goes through a backend stored procedure so the
//! increment-or-insert is atomic on the database side.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;

use crate::models::VisitStatistic;
use crate::supabase::Supabase;

/// Stats repository trait
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Record one visit for a page on a date
    async fn record_visit(
        &self,
        date: NaiveDate,
        page_path: &str,
        article_id: Option<i64>,
    ) -> Result<()>;

    /// Visit rows on or after a date, newest first
    async fn visits_since(&self, date: NaiveDate) -> Result<Vec<VisitStatistic>>;
}

/// PostgREST-backed stats repository
pub struct PostgrestStatsRepository {
    client: Supabase,
}

impl PostgrestStatsRepository {
    pub fn new(client: Supabase) -> Self {
        Self { client }
    }

    pub fn boxed(client: Supabase) -> Arc<dyn StatsRepository> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl StatsRepository for PostgrestStatsRepository {
    async fn record_visit(
        &self,
        date: NaiveDate,
        page_path: &str,
        article_id: Option<i64>,
    ) -> Result<()> {
        self.client
            .rpc(
                "record_visit",
                json!({
                    "p_date": date,
                    "p_page_path": page_path,
                    "p_article_id": article_id,
                }),
            )
            .await
            .context("failed to record visit")
    }

    async fn visits_since(&self, date: NaiveDate) -> Result<Vec<VisitStatistic>> {
        self.client
            .from("visit_statistics")
            .select("*")
            .gte("date", &date.to_string())
            .order("date.desc")
            .fetch()
            .await
            .context("failed to fetch visit statistics")
    }
}
