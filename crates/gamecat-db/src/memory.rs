use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gamecat_core::{AppId, AppListEntry, CatalogEntry, GameFilter, RankEntry};
use tokio::sync::Mutex;

use crate::{CatalogStore, DbError};

#[derive(Debug, Default)]
struct State {
    games: BTreeMap<AppId, CatalogEntry>,
    ranking: Vec<RankEntry>,
    operations: HashMap<String, DateTime<Utc>>,
    applist: Vec<AppListEntry>,
}

/// Process-local [`CatalogStore`] used by tests and offline runs.
///
/// A single lock guards all tables, so every method is atomic with respect
/// to the others.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `entries`.
    #[must_use]
    pub fn with_games(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let games = entries.into_iter().map(|e| (e.appid, e)).collect();
        Self {
            state: Mutex::new(State {
                games,
                ..State::default()
            }),
        }
    }

    pub async fn game_count(&self) -> usize {
        self.state.lock().await.games.len()
    }

    pub async fn applist_len(&self) -> usize {
        self.state.lock().await.applist.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_game(&self, appid: AppId) -> Result<Option<CatalogEntry>, DbError> {
        Ok(self.state.lock().await.games.get(&appid).cloned())
    }

    async fn list_games(&self) -> Result<Vec<CatalogEntry>, DbError> {
        Ok(self.state.lock().await.games.values().cloned().collect())
    }

    async fn search_games(&self, filter: &GameFilter) -> Result<Vec<CatalogEntry>, DbError> {
        let state = self.state.lock().await;
        Ok(state
            .games
            .values()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }

    async fn insert_game(&self, entry: &CatalogEntry) -> Result<(), DbError> {
        let mut state = self.state.lock().await;
        if state.games.contains_key(&entry.appid) {
            return Err(DbError::Duplicate { appid: entry.appid });
        }
        state.games.insert(entry.appid, entry.clone());
        Ok(())
    }

    async fn delete_game(&self, appid: AppId) -> Result<bool, DbError> {
        Ok(self.state.lock().await.games.remove(&appid).is_some())
    }

    async fn replace_ranking(&self, entries: &[RankEntry]) -> Result<(), DbError> {
        self.state.lock().await.ranking = entries.to_vec();
        Ok(())
    }

    async fn list_ranking(&self, limit: usize) -> Result<Vec<RankEntry>, DbError> {
        let state = self.state.lock().await;
        Ok(state.ranking.iter().take(limit).cloned().collect())
    }

    async fn upsert_operation_time(
        &self,
        operation: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        self.state
            .lock()
            .await
            .operations
            .insert(operation.to_string(), at);
        Ok(())
    }

    async fn last_operation_time(
        &self,
        operation: &str,
    ) -> Result<Option<DateTime<Utc>>, DbError> {
        Ok(self.state.lock().await.operations.get(operation).copied())
    }

    async fn replace_applist(&self, apps: &[AppListEntry]) -> Result<usize, DbError> {
        let mut state = self.state.lock().await;
        state.applist = apps.to_vec();
        Ok(state.applist.len())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
