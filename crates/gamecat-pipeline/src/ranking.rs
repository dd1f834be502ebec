//! Top-sellers ranking refresh.

use std::sync::Arc;

use chrono::Duration;
use gamecat_core::RankEntry;
use gamecat_db::CatalogStore;
use gamecat_scraper::{parse_chart, wait_for_links, PollSettings, RenderBackend, ScraperError};

use crate::freshness::FreshnessCache;
use crate::PipelineError;

/// Operation name under which the last successful refresh is stamped.
pub const RANKING_OPERATION: &str = "last_top_games_update";

/// Re-scrapes the chart when the stored ranking is older than the threshold.
#[derive(Clone)]
pub struct RankingRefresher {
    store: Arc<dyn CatalogStore>,
    freshness: FreshnessCache,
    render: Arc<dyn RenderBackend>,
    chart_url: String,
    poll: PollSettings,
    threshold: Duration,
}

impl RankingRefresher {
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        render: Arc<dyn RenderBackend>,
        chart_url: String,
        poll: PollSettings,
        threshold: Duration,
    ) -> Self {
        Self {
            freshness: FreshnessCache::new(Arc::clone(&store)),
            store,
            render,
            chart_url,
            poll,
            threshold,
        }
    }

    /// Refreshes the ranking if due. Returns `true` if a refresh happened.
    ///
    /// # Errors
    ///
    /// Propagates store errors and any scrape failure; on failure the stored
    /// ranking and its timestamp are left as they were.
    pub async fn refresh_if_due(&self) -> Result<bool, PipelineError> {
        if !self
            .freshness
            .is_due(RANKING_OPERATION, self.threshold)
            .await?
        {
            tracing::debug!("ranking is fresh, serving from store");
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Scrapes the chart, replaces the stored ranking and stamps the refresh.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RenderTimeout`] if the chart never populated.
    /// - [`ScraperError::Render`] if the browser failed or the chart held no
    ///   rankable items.
    /// - [`gamecat_db::DbError`] if the ranking or timestamp cannot be written.
    pub async fn refresh(&self) -> Result<Vec<RankEntry>, PipelineError> {
        let entries = self.scrape_chart().await?;
        if entries.is_empty() {
            return Err(ScraperError::Render("chart contained no rankable items".to_string()).into());
        }

        self.store.replace_ranking(&entries).await?;
        self.freshness.stamp(RANKING_OPERATION).await?;
        tracing::info!(count = entries.len(), "ranking refreshed");
        Ok(entries)
    }

    async fn scrape_chart(&self) -> Result<Vec<RankEntry>, ScraperError> {
        let mut session = self.render.open().await?;
        let rendered = wait_for_links(session.as_mut(), &self.chart_url, self.poll).await;
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "failed to close render session");
        }
        Ok(parse_chart(&rendered?))
    }
}
