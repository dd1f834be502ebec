//! Connection pool and schema migration plumbing.

use std::collections::HashSet;
use std::time::Duration;

use gamecat_core::AppConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::DbError;

// Relative to this crate's Cargo.toml, i.e. `<workspace>/migrations`.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout: Duration::from_secs(config.db_acquire_timeout_secs),
        }
    }
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Applies pending migrations and returns how many there were.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DbError> {
    // The bookkeeping table does not exist yet on a fresh database.
    let applied: HashSet<i64> =
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await
            .map(|versions| versions.into_iter().collect())
            .unwrap_or_default();

    let pending = MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration() && !applied.contains(&m.version))
        .count();

    MIGRATOR.run(pool).await?;
    if pending > 0 {
        tracing::info!(pending, "database migrations applied");
    }
    Ok(pending)
}

/// Round-trips `SELECT 1` to prove the pool can hand out a live connection.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}
