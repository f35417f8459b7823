//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and, when a cron
//! expression is configured, registers the nightly coordinate backfill.

use std::sync::Arc;

use palmagis_core::{GeocodeQuery, GeocodeResult};
use palmagis_geocode::Resolver;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    resolver: Arc<Resolver>,
    config: &palmagis_core::AppConfig,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    if let Some(cron) = &config.backfill_cron {
        register_backfill_job(&scheduler, cron, pool, resolver).await?;
    } else {
        tracing::info!("scheduler: no backfill cron configured; backfill job not registered");
    }

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_backfill_job(
    scheduler: &JobScheduler,
    cron: &str,
    pool: PgPool,
    resolver: Arc<Resolver>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let resolver = Arc::clone(&resolver);

        Box::pin(async move {
            tracing::info!("scheduler: starting coordinate backfill run");
            run_backfill_job(&pool, &resolver).await;
            tracing::info!("scheduler: coordinate backfill run complete");
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: registered coordinate backfill job");
    Ok(())
}

/// Walk the unlocated rows and resolve + persist each, sequentially.
///
/// Individual row failures are logged and skipped so one bad address does
/// not abort the run.
async fn run_backfill_job(pool: &PgPool, resolver: &Resolver) {
    let rows = match palmagis_db::list_furniture_missing_coordinates(pool).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to load backfill work list");
            return;
        }
    };

    if rows.is_empty() {
        tracing::info!("scheduler: every addressed row is located; nothing to backfill");
        return;
    }

    tracing::info!(count = rows.len(), "scheduler: backfilling unlocated rows");

    let mut resolved = 0_usize;
    let mut persisted = 0_usize;
    for row in rows {
        let Some(address) = row.address_trimmed() else {
            continue;
        };
        let query = GeocodeQuery::new(row.furniture_no.clone(), row.description.clone(), address);
        let GeocodeResult::Resolved(coordinates) = resolver.resolve(&query).await else {
            continue;
        };
        resolved += 1;

        match palmagis_db::update_furniture_coordinates_if_exists(
            pool,
            &row.furniture_no,
            coordinates.latitude,
            coordinates.longitude,
        )
        .await
        {
            Ok(true) => persisted += 1,
            Ok(false) => {
                tracing::info!(furniture_no = %row.furniture_no, "scheduler: row vanished before write-back");
            }
            Err(e) => {
                tracing::error!(furniture_no = %row.furniture_no, error = %e, "scheduler: write-back failed");
            }
        }
    }

    tracing::info!(resolved, persisted, "scheduler: backfill summary");
}
