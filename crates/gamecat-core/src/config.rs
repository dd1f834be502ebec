use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_STOREFRONT_BASE_URL: &str = "https://store.steampowered.com";
pub const DEFAULT_APPLIST_URL: &str = "https://api.steampowered.com/ISteamApps/GetAppList/v2";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("GAMECAT_ENV", "development"));

    let bind_addr = parse("GAMECAT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("GAMECAT_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("GAMECAT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("GAMECAT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("GAMECAT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let storefront_base_url = or_default("GAMECAT_STOREFRONT_BASE_URL", DEFAULT_STOREFRONT_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    let applist_url = or_default("GAMECAT_APPLIST_URL", DEFAULT_APPLIST_URL);
    let scraper_request_timeout_secs = positive_u64("GAMECAT_SCRAPER_REQUEST_TIMEOUT_SECS", "10")?;
    let scraper_user_agent = or_default("GAMECAT_SCRAPER_USER_AGENT", "gamecat/0.1 (catalog)");

    let ranking_freshness_secs = parse_u64("GAMECAT_RANKING_FRESHNESS_SECS", "3600")?;
    let render_poll_interval_ms = positive_u64("GAMECAT_RENDER_POLL_INTERVAL_MS", "500")?;
    let render_timeout_secs = positive_u64("GAMECAT_RENDER_TIMEOUT_SECS", "30")?;
    let chrome_executable = optional("GAMECAT_CHROME_EXECUTABLE").map(PathBuf::from);

    let rate_limit_max_calls = parse_u32("GAMECAT_RATE_LIMIT_MAX_CALLS", "100")?;
    let rate_limit_window_secs = positive_u64("GAMECAT_RATE_LIMIT_WINDOW_SECS", "10")?;
    let ranking_warmup_cron = optional("GAMECAT_RANKING_WARMUP_CRON");

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        storefront_base_url,
        applist_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        ranking_freshness_secs,
        render_poll_interval_ms,
        render_timeout_secs,
        chrome_executable,
        rate_limit_max_calls,
        rate_limit_window_secs,
        ranking_warmup_cron,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
