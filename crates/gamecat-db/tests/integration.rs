//! Offline tests for gamecat-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::Utc;
use gamecat_core::{AppConfig, CatalogEntry, DeveloperRoles, Environment};
use gamecat_db::{GameRow, PoolConfig};
use rust_decimal::Decimal;
use sqlx::types::Json;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        storefront_base_url: "https://store.steampowered.com".to_string(),
        applist_url: "https://api.steampowered.com/ISteamApps/GetAppList/v2".to_string(),
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        ranking_freshness_secs: 3600,
        render_poll_interval_ms: 500,
        render_timeout_secs: 30,
        chrome_executable: None,
        rate_limit_max_calls: 100,
        rate_limit_window_secs: 10,
        ranking_warmup_cron: None,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout, std::time::Duration::from_secs(9));
}

#[test]
fn game_row_converts_into_catalog_entry() {
    let mut developers = DeveloperRoles::default();
    developers.developer = Some("Team Cherry".to_string());
    let mut editions = BTreeMap::new();
    editions.insert("Hollow Knight".to_string(), Decimal::new(1499, 2));

    let row = GameRow {
        appid: 367_520,
        title: "Hollow Knight".to_string(),
        description: None,
        release_date: None,
        developers: Json(developers.clone()),
        tags: vec!["Metroidvania".to_string()],
        editions: Json(editions.clone()),
        features: Some(vec![]),
        created_at: Utc::now(),
    };

    let entry = CatalogEntry::try_from(row).expect("valid row");
    assert_eq!(entry.appid.get(), 367_520);
    assert_eq!(entry.developers, developers);
    assert_eq!(entry.editions, editions);
    assert_eq!(entry.features, Some(vec![]));
}
