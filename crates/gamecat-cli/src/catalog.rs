//! Catalog command handlers for the CLI.
//!
//! These run the same pipeline as the HTTP server against the configured
//! Postgres store, printing results to stdout. Logs go to stderr.

use std::sync::Arc;

use clap::Subcommand;
use gamecat_core::{AppConfig, AppId, RankEntry, MAX_RANKING_SIZE};
use gamecat_db::{CatalogStore, PgStore};
use gamecat_pipeline::{Pipeline, PipelineError, PipelineSettings};
use gamecat_scraper::{ChromeBackend, RenderBackend, StorefrontClient};

/// Sub-commands that drive the acquisition pipeline.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Scrape a single game and add it to the catalog
    Add {
        /// Storefront app id
        appid: u32,
        /// Print the extracted entry without storing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the top-sellers ranking, refreshing it first if stale
    Top {
        /// Number of ranked games to show (1-99)
        #[arg(long, default_value = "10")]
        count: usize,
        /// Print full metadata, backfilling games not yet in the catalog
        #[arg(long)]
        with_metadata: bool,
    },
    /// Download the public app list and replace the local mirror
    Applist,
}

/// Wires the Postgres store, storefront client and headless browser into a
/// [`Pipeline`].
///
/// # Errors
///
/// Returns an error if the storefront HTTP client cannot be built.
pub(crate) fn build_pipeline(
    pool: gamecat_db::PgPool,
    config: &AppConfig,
) -> anyhow::Result<Pipeline> {
    let store: Arc<dyn CatalogStore> = Arc::new(PgStore::new(pool));
    let client = StorefrontClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build storefront client: {e}"))?;
    let render: Arc<dyn RenderBackend> = Arc::new(ChromeBackend::from_config(config));
    Ok(Pipeline::new(
        store,
        client,
        render,
        PipelineSettings::from_config(config),
    ))
}

pub(crate) async fn run(pipeline: &Pipeline, command: CatalogCommands) -> anyhow::Result<()> {
    match command {
        CatalogCommands::Add { appid, dry_run } => run_add(pipeline, appid, dry_run).await,
        CatalogCommands::Top {
            count,
            with_metadata,
        } => run_top(pipeline, count, with_metadata).await,
        CatalogCommands::Applist => {
            let apps = pipeline.mirror_applist().await?;
            println!("mirrored {} apps", apps.len());
            Ok(())
        }
    }
}

async fn run_add(pipeline: &Pipeline, raw: u32, dry_run: bool) -> anyhow::Result<()> {
    let appid = parse_appid(raw)?;

    let result = if dry_run {
        pipeline.validate_and_extract(appid).await
    } else {
        pipeline.add_game(appid).await
    };
    let entry = result.map_err(|e| describe_add_error(appid, e))?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("added {}: {}", entry.appid, entry.title);
    }
    Ok(())
}

async fn run_top(pipeline: &Pipeline, count: usize, with_metadata: bool) -> anyhow::Result<()> {
    if with_metadata {
        let entries = pipeline.get_ranking_with_metadata(count).await?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        let ranking = pipeline.get_ranking(count).await?;
        for line in format_ranking(&ranking) {
            println!("{line}");
        }
    }
    Ok(())
}

fn parse_appid(raw: u32) -> anyhow::Result<AppId> {
    AppId::new(raw).ok_or_else(|| anyhow::anyhow!("appid must be a positive integer"))
}

fn describe_add_error(appid: AppId, error: PipelineError) -> anyhow::Error {
    if error.is_not_found() {
        anyhow::anyhow!("no game exists with appid {appid}: {error}")
    } else {
        anyhow::Error::new(error)
    }
}

/// One line per ranked game, position right-aligned to the widest rank.
fn format_ranking(ranking: &[RankEntry]) -> Vec<String> {
    let width = MAX_RANKING_SIZE.min(ranking.len()).to_string().len();
    ranking
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>width$}. {:<8} {}",
                i + 1,
                entry.appid.get(),
                entry.title
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use gamecat_scraper::ScraperError;

    use super::*;

    fn rank(raw: u32, title: &str) -> RankEntry {
        RankEntry {
            appid: AppId::new(raw).unwrap(),
            title: title.to_string(),
        }
    }

    #[test]
    fn ranking_lines_are_numbered_from_one() {
        let lines = format_ranking(&[rank(730, "Counter-Strike 2"), rank(570, "Dota 2")]);
        assert_eq!(lines, vec!["1. 730      Counter-Strike 2", "2. 570      Dota 2"]);
    }

    #[test]
    fn ranking_positions_align_past_nine() {
        let ranking: Vec<RankEntry> = (1..=10).map(|i| rank(i, "Game")).collect();
        let lines = format_ranking(&ranking);
        assert!(lines[0].starts_with(" 1. "));
        assert!(lines[9].starts_with("10. "));
    }

    #[test]
    fn zero_appid_is_rejected() {
        assert!(parse_appid(0).is_err());
        assert_eq!(parse_appid(440).unwrap().get(), 440);
    }

    #[test]
    fn not_found_errors_name_the_appid() {
        let appid = AppId::new(42).unwrap();
        let err = describe_add_error(appid, ScraperError::NotResolved { appid }.into());
        assert!(err.to_string().starts_with("no game exists with appid 42"));

        let conflict = describe_add_error(appid, PipelineError::AlreadyExists { appid });
        assert!(conflict.downcast_ref::<PipelineError>().is_some());
    }
}
