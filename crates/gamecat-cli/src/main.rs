mod catalog;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::catalog::CatalogCommands;

#[derive(Debug, Parser)]
#[command(name = "gamecat-cli")]
#[command(about = "gamecat command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    #[command(flatten)]
    Catalog(CatalogCommands),
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("gamecat-cli: no command given, see --help");
        return Ok(());
    };

    let config = gamecat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?command, "dispatching command");

    let pool_config = gamecat_db::PoolConfig::from_app_config(&config);
    let pool = gamecat_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            gamecat_db::ping(&pool).await?;
            println!("database ok");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = gamecat_db::run_migrations(&pool).await?;
            println!("applied {applied} new migration(s)");
        }
        Commands::Catalog(command) => {
            let pipeline = catalog::build_pipeline(pool, &config)?;
            catalog::run(&pipeline, command).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
