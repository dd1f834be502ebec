//! Catalog persistence: the [`CatalogStore`] seam, its Postgres
//! implementation and an in-memory stand-in for tests.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    #[error("game {appid} is already stored")]
    Duplicate { appid: gamecat_core::AppId },
    #[error("stored row is invalid: {0}")]
    InvalidRow(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub mod applist;
pub mod games;
pub mod memory;
pub mod operations;
pub mod pool;
pub mod postgres;
pub mod rankings;
pub mod store;

pub use games::{delete_game, get_game, insert_game, list_games, search_games, GameRow};
pub use memory::MemoryStore;
pub use operations::{get_operation_time, upsert_operation_time};
pub use pool::{connect_pool, ping, run_migrations, PoolConfig};
pub use postgres::PgStore;
pub use rankings::{list_ranking, replace_ranking};
pub use sqlx::PgPool;
pub use store::CatalogStore;

