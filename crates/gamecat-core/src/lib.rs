pub mod app_config;
pub mod catalog;
pub mod config;
pub mod filter;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{AppId, AppListEntry, CatalogEntry, DeveloperRoles, RankEntry, Role};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use filter::{GameFilter, PriceRange};

/// Largest ranking any caller may request; refreshes always collect this many.
pub const MAX_RANKING_SIZE: usize = 99;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid appid: {0}")]
    InvalidAppId(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
