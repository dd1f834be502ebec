use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Storefront origin, e.g. `https://store.steampowered.com`.
    pub storefront_base_url: String,
    /// Public app-list endpoint mirrored by the applist route.
    pub applist_url: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Maximum age of the cached ranking before a re-scrape.
    pub ranking_freshness_secs: u64,
    pub render_poll_interval_ms: u64,
    pub render_timeout_secs: u64,
    /// Explicit Chrome/Chromium binary; auto-detected when unset.
    pub chrome_executable: Option<PathBuf>,
    pub rate_limit_max_calls: u32,
    pub rate_limit_window_secs: u64,
    /// Cron expression for the ranking warm-up job; disabled when unset.
    pub ranking_warmup_cron: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("storefront_base_url", &self.storefront_base_url)
            .field("applist_url", &self.applist_url)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("ranking_freshness_secs", &self.ranking_freshness_secs)
            .field("render_poll_interval_ms", &self.render_poll_interval_ms)
            .field("render_timeout_secs", &self.render_timeout_secs)
            .field("chrome_executable", &self.chrome_executable)
            .field("rate_limit_max_calls", &self.rate_limit_max_calls)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("ranking_warmup_cron", &self.ranking_warmup_cron)
            .finish()
    }
}
