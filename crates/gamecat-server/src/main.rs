mod api;
mod middleware;
mod scheduler;

use std::{net::SocketAddr, sync::Arc};

use gamecat_db::{CatalogStore, PgStore};
use gamecat_pipeline::{Pipeline, PipelineSettings};
use gamecat_scraper::{ChromeBackend, RenderBackend, StorefrontClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = gamecat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = gamecat_db::PoolConfig::from_app_config(&config);
    let pool = gamecat_db::connect_pool(&config.database_url, pool_config).await?;
    gamecat_db::run_migrations(&pool).await?;

    let store: Arc<dyn CatalogStore> = Arc::new(PgStore::new(pool));
    let client = StorefrontClient::from_config(&config)?;
    let render: Arc<dyn RenderBackend> = Arc::new(ChromeBackend::from_config(&config));
    let pipeline = Pipeline::new(
        store,
        client,
        render,
        PipelineSettings::from_config(&config),
    );

    let _scheduler =
        scheduler::build_scheduler(pipeline.clone(), config.ranking_warmup_cron.as_deref())
            .await?;

    let app = build_app(AppState { pipeline }, RateLimitState::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "gamecat-server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
