//! Catalog acquisition pipeline: ranking refresh, lazy metadata backfill and
//! on-demand adds, on top of a [`CatalogStore`] and the storefront scraper.

pub mod backfill;
pub mod error;
pub mod freshness;
pub mod ranking;

use std::sync::Arc;

use chrono::Duration;
use gamecat_core::{
    AppConfig, AppId, AppListEntry, CatalogEntry, GameFilter, RankEntry, MAX_RANKING_SIZE,
};
use gamecat_db::{CatalogStore, DbError};
use gamecat_scraper::{PollSettings, RenderBackend, StorefrontClient};

pub use backfill::Backfill;
pub use error::PipelineError;
pub use freshness::FreshnessCache;
pub use ranking::{RankingRefresher, RANKING_OPERATION};

/// Tunables that do not come from the store or the scraper clients.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub ranking_freshness: Duration,
    pub poll: PollSettings,
    pub applist_url: String,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ranking_freshness: Duration::from_std(std::time::Duration::from_secs(
                config.ranking_freshness_secs,
            ))
            .unwrap_or_else(|_| Duration::weeks(52_000)),
            poll: PollSettings::from_config(config),
            applist_url: config.applist_url.clone(),
        }
    }
}

/// Entry point used by the HTTP server, the CLI and the warm-up job.
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn CatalogStore>,
    client: StorefrontClient,
    refresher: RankingRefresher,
    backfill: Backfill,
    applist_url: String,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        client: StorefrontClient,
        render: Arc<dyn RenderBackend>,
        settings: PipelineSettings,
    ) -> Self {
        let refresher = RankingRefresher::new(
            Arc::clone(&store),
            render,
            client.chart_url(),
            settings.poll,
            settings.ranking_freshness,
        );
        let backfill = Backfill::new(Arc::clone(&store), client.clone());
        Self {
            store,
            client,
            refresher,
            backfill,
            applist_url: settings.applist_url,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    #[must_use]
    pub fn refresher(&self) -> &RankingRefresher {
        &self.refresher
    }

    /// Validates `appid` against the storefront and extracts its entry
    /// without touching the store.
    ///
    /// # Errors
    ///
    /// See [`Backfill::validate_and_extract`].
    pub async fn validate_and_extract(&self, appid: AppId) -> Result<CatalogEntry, PipelineError> {
        self.backfill.validate_and_extract(appid).await
    }

    /// Returns the top `count` ranked items, refreshing the ranking first if
    /// it is stale.
    ///
    /// A failed refresh falls back to the previously stored ranking when
    /// there is one; the timestamp is not stamped, so the next call retries.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidCount`] unless `1 <= count <= 99`.
    /// - The refresh error when it fails and nothing is stored yet.
    pub async fn get_ranking(&self, count: usize) -> Result<Vec<RankEntry>, PipelineError> {
        check_count(count)?;

        if let Err(refresh_err) = self.refresher.refresh_if_due().await {
            let stale = self.store.list_ranking(count).await?;
            if stale.is_empty() {
                return Err(refresh_err);
            }
            tracing::warn!(error = %refresh_err, "ranking refresh failed, serving stored ranking");
            return Ok(stale);
        }

        Ok(self.store.list_ranking(count).await?)
    }

    /// Returns full metadata for the top `count` ranked items, backfilling
    /// any that are not yet in the catalog.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::get_ranking`] and [`Backfill::backfill`].
    pub async fn get_ranking_with_metadata(
        &self,
        count: usize,
    ) -> Result<Vec<CatalogEntry>, PipelineError> {
        let ranking = self.get_ranking(count).await?;
        self.backfill.backfill(&ranking).await
    }

    /// Adds a single item to the catalog on demand.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::AlreadyExists`] if the item is already stored,
    ///   including when a concurrent add wins the insert.
    /// - Any scrape or store failure.
    pub async fn add_game(&self, appid: AppId) -> Result<CatalogEntry, PipelineError> {
        if self.store.find_game(appid).await?.is_some() {
            return Err(PipelineError::AlreadyExists { appid });
        }

        let entry = self.backfill.validate_and_extract(appid).await?;
        match self.store.insert_game(&entry).await {
            Ok(()) => {
                tracing::info!(appid = %appid, title = %entry.title, "game added");
                Ok(entry)
            }
            Err(DbError::Duplicate { appid }) => Err(PipelineError::AlreadyExists { appid }),
            Err(e) => Err(e.into()),
        }
    }

    /// # Errors
    ///
    /// - [`PipelineError::EmptyFilter`] when no criterion or price bound is set.
    /// - Store failures.
    pub async fn search(&self, filter: &GameFilter) -> Result<Vec<CatalogEntry>, PipelineError> {
        if filter.is_empty() {
            return Err(PipelineError::EmptyFilter);
        }
        Ok(self.store.search_games(filter).await?)
    }

    /// # Errors
    ///
    /// Store failures.
    pub async fn list_games(&self) -> Result<Vec<CatalogEntry>, PipelineError> {
        Ok(self.store.list_games().await?)
    }

    /// Downloads the public app list and replaces the local mirror with it.
    ///
    /// # Errors
    ///
    /// Fetch, parse or store failures; the mirror is untouched on a failed
    /// fetch.
    pub async fn mirror_applist(&self) -> Result<Vec<AppListEntry>, PipelineError> {
        let apps = self.client.fetch_applist(&self.applist_url).await?;
        let stored = self.store.replace_applist(&apps).await?;
        tracing::info!(count = stored, "app list mirrored");
        Ok(apps)
    }
}

fn check_count(count: usize) -> Result<(), PipelineError> {
    if (1..=MAX_RANKING_SIZE).contains(&count) {
        Ok(())
    } else {
        Err(PipelineError::InvalidCount {
            count,
            max: MAX_RANKING_SIZE,
        })
    }
}
