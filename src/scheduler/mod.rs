//! Cron scheduler driving the periodic owner syncs.
//!
//! Wraps `tokio_cron_scheduler` with one registered job per sync kind.
//! Each cron firing fans out over the active owners and schedules their
//! sync jobs into the worker queue, staggered so a large owner set does
//! not hit ESI in one burst.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::Error;
use crate::worker::queue::WorkerQueue;

pub mod config;
pub mod owner;
pub mod schedule;

/// Job scheduler for the recurring owner sync fan-outs.
pub struct Scheduler {
    db: DatabaseConnection,
    queue: WorkerQueue,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Arguments
    /// - `db` - Database connection for querying the owners due for a sync
    /// - `queue` - Worker queue the fan-outs schedule sync jobs into
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(db: DatabaseConnection, queue: WorkerQueue) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { db, queue, sched })
    }

    /// Registers all recurring sync jobs and starts the scheduler.
    ///
    /// Once started, the blueprint, industry job, and asset container
    /// fan-outs run on their configured cron expressions until the process
    /// exits.
    ///
    /// # Returns
    /// - `Ok(())` - All jobs successfully registered and scheduler started
    /// - `Err(Error)` - Failed to register a job or start the scheduler
    pub async fn start(mut self) -> Result<(), Error> {
        self.schedule_job(
            config::blueprints::CRON_EXPRESSION,
            "blueprint sync",
            owner::schedule_blueprint_syncs,
        )
        .await?;

        self.schedule_job(
            config::industry_jobs::CRON_EXPRESSION,
            "industry job sync",
            owner::schedule_industry_job_syncs,
        )
        .await?;

        self.schedule_job(
            config::locations::CRON_EXPRESSION,
            "asset container sync",
            owner::schedule_location_syncs,
        )
        .await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// The function receives clones of the database connection and worker
    /// queue on every firing. The number of jobs it queued is logged on
    /// success, errors are logged and swallowed so one bad firing never
    /// takes the schedule down.
    ///
    /// # Arguments
    /// - `cron` - Cron expression defining when the job runs
    /// - `name` - Human-readable name for the job, used in log messages
    /// - `function` - Async fan-out returning the number of queued jobs
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(DatabaseConnection, WorkerQueue) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let queue = self.queue.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let db = db.clone();
                let queue = queue.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(db, queue).await {
                        Ok(count) => tracing::debug!("Queued {} {} job(s)", count, name),
                        Err(e) => tracing::error!("Error scheduling {}: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
