//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup. The only job is the
//! optional ranking warm-up, which refreshes the top-sellers ranking ahead of
//! user requests so they rarely pay for a headless render.

use gamecat_core::MAX_RANKING_SIZE;
use gamecat_pipeline::Pipeline;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// warm-up cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    pipeline: Pipeline,
    warmup_cron: Option<&str>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    match warmup_cron {
        Some(cron) => register_ranking_warmup_job(&scheduler, pipeline, cron).await?,
        None => tracing::info!("scheduler: ranking warm-up disabled"),
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the ranking warm-up job on `cron` (six-field, seconds first).
async fn register_ranking_warmup_job(
    scheduler: &JobScheduler,
    pipeline: Pipeline,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let pipeline = pipeline.clone();

        Box::pin(async move {
            match pipeline.get_ranking(MAX_RANKING_SIZE).await {
                Ok(ranking) => {
                    tracing::info!(count = ranking.len(), "scheduler: ranking warm-up complete");
                }
                Err(e) => {
                    tracing::error!(error = %e, "scheduler: ranking warm-up failed");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: registered ranking warm-up job");
    Ok(())
}
