//! Lazy metadata backfill for ranked items.

use std::sync::Arc;

use gamecat_core::{AppId, CatalogEntry, RankEntry};
use gamecat_db::{CatalogStore, DbError};
use gamecat_scraper::{extract_entry, StorefrontClient};

use crate::PipelineError;

#[derive(Clone)]
pub struct Backfill {
    store: Arc<dyn CatalogStore>,
    client: StorefrontClient,
}

impl Backfill {
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>, client: StorefrontClient) -> Self {
        Self { store, client }
    }

    /// Fetches the item page for `appid` and extracts its entry. One GET
    /// serves both the validity check and the extraction.
    ///
    /// # Errors
    ///
    /// - [`gamecat_scraper::ScraperError::NotResolved`] if the id does not
    ///   resolve to an item page.
    /// - [`gamecat_scraper::ScraperError::ExtractionFailed`] /
    ///   [`gamecat_scraper::ScraperError::MalformedField`] if a required field
    ///   is missing or unparseable.
    /// - Transport errors from the fetch.
    pub async fn validate_and_extract(&self, appid: AppId) -> Result<CatalogEntry, PipelineError> {
        let document = self.client.resolve_app(appid).await?;
        let extraction = extract_entry(appid, &document.body)?;
        tracing::debug!(
            appid = %appid,
            editions = extraction.entry.editions.len(),
            skipped_editions = extraction.skipped_editions,
            "extracted catalog entry"
        );
        Ok(extraction.entry)
    }

    /// Returns the stored entry for `appid`, scraping and persisting it first
    /// if the catalog does not have it yet.
    ///
    /// Losing an insert race to another caller is not an error: the winner's
    /// row is read back and returned.
    ///
    /// # Errors
    ///
    /// Any scrape or store failure.
    pub async fn entry_for(&self, appid: AppId) -> Result<CatalogEntry, PipelineError> {
        if let Some(entry) = self.store.find_game(appid).await? {
            return Ok(entry);
        }

        tracing::info!(appid = %appid, "backfilling catalog entry");
        let entry = self.validate_and_extract(appid).await?;
        match self.store.insert_game(&entry).await {
            Ok(()) => Ok(entry),
            Err(DbError::Duplicate { .. }) => {
                tracing::debug!(appid = %appid, "entry stored concurrently, re-reading");
                self.store
                    .find_game(appid)
                    .await?
                    .ok_or(PipelineError::Db(DbError::NotFound))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves full metadata for every ranked item, in ranking order.
    ///
    /// Stops at the first failure.
    ///
    /// # Errors
    ///
    /// The first error from [`Backfill::entry_for`].
    pub async fn backfill(&self, ranking: &[RankEntry]) -> Result<Vec<CatalogEntry>, PipelineError> {
        let mut entries = Vec::with_capacity(ranking.len());
        for ranked in ranking {
            entries.push(self.entry_for(ranked.appid).await?);
        }
        Ok(entries)
    }
}
