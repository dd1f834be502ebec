//! Storage abstraction consumed by the acquisition pipeline.
//!
//! [`crate::PgStore`] backs production; [`crate::MemoryStore`] backs tests
//! and local runs without Postgres. Both enforce one catalog entry per
//! `appid` and replace the ranking as a single unit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gamecat_core::{AppId, AppListEntry, CatalogEntry, GameFilter, RankEntry};

use crate::DbError;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_game(&self, appid: AppId) -> Result<Option<CatalogEntry>, DbError>;

    async fn list_games(&self) -> Result<Vec<CatalogEntry>, DbError>;

    async fn search_games(&self, filter: &GameFilter) -> Result<Vec<CatalogEntry>, DbError>;

    /// Inserts a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Duplicate`] when an entry with the same `appid`
    /// already exists; the stored entry is left untouched.
    async fn insert_game(&self, entry: &CatalogEntry) -> Result<(), DbError>;

    /// Removes an entry; returns `false` when nothing was stored.
    async fn delete_game(&self, appid: AppId) -> Result<bool, DbError>;

    /// Replaces the stored ranking with `entries`, in order.
    async fn replace_ranking(&self, entries: &[RankEntry]) -> Result<(), DbError>;

    /// Returns up to `limit` ranking entries, best seller first.
    async fn list_ranking(&self, limit: usize) -> Result<Vec<RankEntry>, DbError>;

    async fn upsert_operation_time(
        &self,
        operation: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DbError>;

    async fn last_operation_time(&self, operation: &str)
        -> Result<Option<DateTime<Utc>>, DbError>;

    /// Replaces the app-list mirror; returns the number of rows stored.
    async fn replace_applist(&self, apps: &[AppListEntry]) -> Result<usize, DbError>;

    async fn ping(&self) -> Result<(), DbError>;
}
