use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gamecat_core::{AppId, AppListEntry, CatalogEntry, GameFilter, RankEntry};
use sqlx::PgPool;

use crate::{applist, games, operations, rankings, CatalogStore, DbError};

/// [`CatalogStore`] backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn find_game(&self, appid: AppId) -> Result<Option<CatalogEntry>, DbError> {
        games::get_game(&self.pool, appid).await
    }

    async fn list_games(&self) -> Result<Vec<CatalogEntry>, DbError> {
        games::list_games(&self.pool).await
    }

    async fn search_games(&self, filter: &GameFilter) -> Result<Vec<CatalogEntry>, DbError> {
        games::search_games(&self.pool, filter).await
    }

    async fn insert_game(&self, entry: &CatalogEntry) -> Result<(), DbError> {
        games::insert_game(&self.pool, entry).await
    }

    async fn delete_game(&self, appid: AppId) -> Result<bool, DbError> {
        games::delete_game(&self.pool, appid).await
    }

    async fn replace_ranking(&self, entries: &[RankEntry]) -> Result<(), DbError> {
        rankings::replace_ranking(&self.pool, entries).await
    }

    async fn list_ranking(&self, limit: usize) -> Result<Vec<RankEntry>, DbError> {
        rankings::list_ranking(&self.pool, limit).await
    }

    async fn upsert_operation_time(
        &self,
        operation: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        operations::upsert_operation_time(&self.pool, operation, at).await
    }

    async fn last_operation_time(
        &self,
        operation: &str,
    ) -> Result<Option<DateTime<Utc>>, DbError> {
        operations::get_operation_time(&self.pool, operation).await
    }

    async fn replace_applist(&self, apps: &[AppListEntry]) -> Result<usize, DbError> {
        applist::replace_applist(&self.pool, apps).await
    }

    async fn ping(&self) -> Result<(), DbError> {
        crate::ping(&self.pool).await
    }
}
