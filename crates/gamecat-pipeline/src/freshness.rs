//! Per-operation "is a refresh due?" bookkeeping on top of the store's
//! operation timestamps.
//!
//! There is no lock: two callers can both see an operation as due and both
//! refresh it.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use gamecat_db::{CatalogStore, DbError};

#[derive(Clone)]
pub struct FreshnessCache {
    store: Arc<dyn CatalogStore>,
}

impl FreshnessCache {
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the timestamp cannot be read.
    pub async fn is_due(&self, operation: &str, threshold: Duration) -> Result<bool, DbError> {
        self.is_due_at(operation, threshold, Utc::now()).await
    }

    /// Due when the operation never ran or ran at least `threshold` before `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the timestamp cannot be read.
    pub async fn is_due_at(
        &self,
        operation: &str,
        threshold: Duration,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        let due = match self.store.last_operation_time(operation).await? {
            None => true,
            Some(stamped) => now - stamped >= threshold,
        };
        tracing::debug!(operation, due, "freshness check");
        Ok(due)
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the timestamp cannot be written.
    pub async fn stamp(&self, operation: &str) -> Result<(), DbError> {
        self.stamp_at(operation, Utc::now()).await
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the timestamp cannot be written.
    pub async fn stamp_at(&self, operation: &str, at: DateTime<Utc>) -> Result<(), DbError> {
        self.store.upsert_operation_time(operation, at).await
    }
}
