//! Worker pool for processing background jobs with concurrency control.
//!
//! This module provides the `WorkerPool` that manages dispatcher tasks, job execution,
//! and concurrency limits using semaphores. The pool polls the queue for jobs and spawns
//! tasks to process them with configurable timeout and shutdown behavior. Deferred
//! failures are rescheduled according to their error's retry strategy.

mod config;

pub use config::WorkerPoolConfig;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Notify, OwnedSemaphorePermit, RwLock, Semaphore};
use tokio::task::JoinHandle;

use crate::error::retry::ErrorRetryStrategy;
use crate::model::worker::WorkerJob;
use crate::worker::handler::WorkerJobHandler;
use crate::worker::queue::{InFlightGuard, WorkerQueue};

/// Worker pool for processing jobs from the WorkerQueue.
///
/// Manages multiple dispatcher tasks that poll the queue for jobs and spawn execution
/// tasks with semaphore-based concurrency control. Provides graceful shutdown and
/// monitoring.
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<WorkerPoolRef>,
}

/// Internal worker pool reference with configuration and runtime state.
///
/// Contains the worker pool configuration, job queue, handler, and runtime state
/// including semaphores for concurrency control, shutdown notifications, and dispatcher
/// task handles. This struct is wrapped in an Arc by `WorkerPool` for cheap cloning.
pub struct WorkerPoolRef {
    config: WorkerPoolConfig,
    queue: WorkerQueue,
    handler: Arc<WorkerJobHandler>,
    semaphore: Arc<Semaphore>,
    shutdown: Arc<Notify>,
    dispatcher_handles: Arc<RwLock<Vec<JoinHandle<()>>>>,
}

impl WorkerPool {
    /// Creates a new worker pool.
    ///
    /// Initializes a worker pool with the specified configuration, job queue, and handler.
    /// The pool is created in a stopped state and must be started with `start()`.
    ///
    /// # Arguments
    /// - `config` - Configuration including max concurrent jobs and dispatcher settings
    /// - `queue` - Job queue for fetching jobs
    /// - `handler` - Job handler for executing different job types
    ///
    /// # Returns
    /// - `WorkerPool` - New worker pool ready to start
    pub fn new(config: WorkerPoolConfig, queue: WorkerQueue, handler: WorkerJobHandler) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let shutdown = Arc::new(Notify::new());

        Self {
            inner: Arc::new(WorkerPoolRef {
                config,
                handler: Arc::new(handler),
                queue,
                semaphore,
                shutdown,
                dispatcher_handles: Arc::new(RwLock::new(Vec::new())),
            }),
        }
    }

    /// Starts the worker pool.
    ///
    /// Spawns the configured number of dispatcher tasks that poll the queue for jobs and
    /// spawn execution tasks. The semaphore controls maximum concurrency. Also starts
    /// the queue cleanup task for removing stale jobs.
    ///
    /// This method is non-blocking and returns immediately after spawning dispatchers.
    /// It is idempotent - calling it when already running logs a warning and returns.
    pub async fn start(&self) {
        let mut handles = self.inner.dispatcher_handles.write().await;

        if !handles.is_empty() {
            tracing::warn!("Worker pool is already running");
            return;
        }

        tracing::info!(
            "Starting worker pool with {} dispatcher(s) (max {} concurrent jobs)",
            self.inner.config.dispatcher_count,
            self.inner.config.max_concurrent_jobs
        );

        // Start the job queue cleanup task
        self.inner.queue.start_cleanup().await;

        // Spawn all dispatcher tasks
        for id in 0..self.inner.config.dispatcher_count {
            let handle = self.spawn_dispatcher(id);
            handles.push(handle);
        }

        tracing::info!(
            "Worker pool started successfully ({} dispatcher(s) active)",
            self.inner.config.dispatcher_count
        );
    }

    /// Spawns a single dispatcher task.
    ///
    /// Creates a tokio task that continuously polls the queue for jobs and spawns
    /// execution tasks. The dispatcher respects shutdown signals and exits cleanly.
    ///
    /// # Arguments
    /// - `id` - Dispatcher identifier for logging
    ///
    /// # Returns
    /// - `JoinHandle<()>` - Handle to the spawned dispatcher task
    fn spawn_dispatcher(&self, id: usize) -> JoinHandle<()> {
        let config = self.inner.config.clone();
        let queue = self.inner.queue.clone();
        let handler = Arc::clone(&self.inner.handler);
        let semaphore = Arc::clone(&self.inner.semaphore);
        let shutdown = Arc::clone(&self.inner.shutdown);

        tokio::spawn(async move {
            tracing::info!("Dispatcher {} started", id);

            loop {
                tokio::select! {
                    // Biased select ensures shutdown signal is prioritized
                    // over processing new jobs, enabling faster shutdown.
                    biased;

                    _ = shutdown.notified() => {
                        tracing::debug!("Dispatcher {} received shutdown signal", id);
                        break;
                    }

                    _ = Self::process_jobs(
                        id,
                        &config,
                        &queue,
                        &handler,
                        &semaphore,
                    ) => {
                        // Continue to next iteration
                    }
                }
            }

            tracing::info!("Dispatcher {} stopped", id);
        })
    }

    /// Processes jobs from the queue.
    ///
    /// Polls the queue for a due job and spawns a task to process it if available.
    /// Blocks on semaphore if at capacity. Sleeps if queue is empty. Returns jobs to
    /// queue if semaphore is closed (shutting down).
    ///
    /// # Arguments
    /// - `dispatcher_id` - Dispatcher identifier for logging
    /// - `config` - Pool configuration for timing values
    /// - `queue` - Job queue to poll
    /// - `handler` - Job handler for execution
    /// - `semaphore` - Concurrency limit semaphore
    async fn process_jobs(
        dispatcher_id: usize,
        config: &WorkerPoolConfig,
        queue: &WorkerQueue,
        handler: &Arc<WorkerJobHandler>,
        semaphore: &Arc<Semaphore>,
    ) {
        match queue.pop() {
            Some((job, guard)) => {
                // Try to acquire a permit (blocks if at capacity)
                match semaphore.clone().acquire_owned().await {
                    Ok(permit) => {
                        // Clone references for the spawned task
                        let handler = Arc::clone(handler);
                        let queue = queue.clone();
                        let timeout = config.job_timeout();

                        // Spawn task to execute the job
                        tokio::spawn(async move {
                            Self::execute_job(job, guard, handler, queue, timeout, permit).await;
                        });
                    }
                    Err(_) => {
                        // Semaphore closed (shutting down), push job back.
                        // The guard must drop first or the push is refused
                        // as an in-flight duplicate.
                        drop(guard);
                        queue.push(job);
                        tracing::debug!(
                            "Dispatcher {} semaphore closed, returned job to queue",
                            dispatcher_id
                        );
                    }
                }
            }
            None => {
                // Queue is empty, sleep before next poll
                tokio::time::sleep(config.poll_interval()).await;
            }
        }
    }

    /// Executes a job with timeout.
    ///
    /// Wraps job execution with timeout to prevent hung jobs. The semaphore permit is
    /// held until completion, limiting concurrency. Logs success, reschedules deferred
    /// failures per the error's retry strategy, and logs permanent failures.
    ///
    /// # Arguments
    /// - `job` - Worker job to execute
    /// - `guard` - In-flight reservation for the job's identity
    /// - `handler` - Job handler for execution
    /// - `queue` - Queue to reschedule deferred failures into
    /// - `timeout` - Maximum execution time
    /// - `_permit` - Semaphore permit (held until dropped)
    async fn execute_job(
        job: WorkerJob,
        guard: InFlightGuard,
        handler: Arc<WorkerJobHandler>,
        queue: WorkerQueue,
        timeout: Duration,
        _permit: OwnedSemaphorePermit,
    ) {
        // Execute job with timeout
        let result = tokio::time::timeout(timeout, handler.handle(&job)).await;

        // Release the in-flight reservation before any requeue, otherwise
        // the retry suppresses itself as a duplicate
        drop(guard);

        match result {
            Ok(Ok(())) => {
                // Job completed successfully
                tracing::debug!("Job completed: {}", job);
            }
            Ok(Err(e)) => match e.to_retry_strategy() {
                ErrorRetryStrategy::Retry => {
                    // The handler already spent its in-process attempt budget
                    // on transient errors; the next scheduled cycle re-attempts
                    tracing::error!(
                        "Job gave up after transient failures: {}, error: {:?}",
                        job,
                        e
                    );
                }
                ErrorRetryStrategy::RetryIn(seconds) => {
                    let retry_at = Utc::now() + chrono::Duration::seconds(seconds);
                    tracing::warn!(
                        "Job deferred for {}s: {}, error: {:?}",
                        seconds,
                        job,
                        e
                    );
                    queue.schedule(job, retry_at);
                }
                ErrorRetryStrategy::Fail => {
                    tracing::error!("Job failed: {}, error: {:?}", job, e);
                }
            },
            Err(_) => {
                tracing::error!("Job timed out after {} seconds: {}", timeout.as_secs(), job);
            }
        }

        // Permit automatically dropped here, releasing semaphore slot
    }

    /// Stops the worker pool gracefully.
    ///
    /// Signals all dispatchers to stop, closes the semaphore to prevent new jobs,
    /// and stops the queue cleanup task. Waits for all dispatchers to shut down with
    /// a configured timeout. In-flight job-processing tasks continue to completion.
    ///
    /// This method is idempotent - calling it when already stopped returns immediately.
    /// It blocks until all dispatchers have shut down or timeout is reached.
    ///
    /// # Note
    /// Call this method before dropping the WorkerPool to ensure clean shutdown.
    /// Dropping without calling stop() may leave orphaned tasks.
    pub async fn stop(&self) {
        // Check if already stopped (idempotent)
        if !self.is_running().await {
            tracing::debug!("Worker pool is already stopped");
            return;
        }

        tracing::info!("Shutting down worker pool...");

        // Close semaphore to prevent new jobs from starting
        self.inner.semaphore.close();

        // Signal all dispatchers to stop
        self.inner.shutdown.notify_waiters();

        // Stop the job queue cleanup task
        self.inner.queue.stop_cleanup().await;

        // Wait for all dispatchers to finish (with timeout)
        let mut handles = self.inner.dispatcher_handles.write().await;
        let dispatcher_count = handles.len();

        for (i, handle) in handles.drain(..).enumerate() {
            let timeout_result =
                tokio::time::timeout(self.inner.config.shutdown_timeout(), handle).await;

            match timeout_result {
                Ok(Ok(())) => {
                    // Dispatcher stopped cleanly
                    tracing::debug!("Dispatcher {} stopped cleanly", i);
                }
                Ok(Err(e)) => {
                    tracing::error!("Dispatcher {} panicked: {:?}", i, e);
                }
                Err(_) => {
                    tracing::warn!("Dispatcher {} did not stop within timeout", i);
                }
            }
        }

        tracing::info!(
            "Worker pool shut down ({} dispatchers stopped, in-flight tasks will complete)",
            dispatcher_count
        );
    }

    /// Checks if the worker pool is running.
    ///
    /// # Returns
    /// - `true` - Pool has active dispatchers
    /// - `false` - Pool is stopped
    pub async fn is_running(&self) -> bool {
        let handles = self.inner.dispatcher_handles.read().await;
        !handles.is_empty()
    }

    /// Gets the number of active dispatchers.
    pub async fn dispatcher_count(&self) -> usize {
        let handles = self.inner.dispatcher_handles.read().await;
        handles.len()
    }

    /// Gets the number of available semaphore permits.
    ///
    /// This indicates how many more jobs can be spawned before hitting the
    /// concurrency limit. A value of 0 means the system is at capacity.
    pub fn available_permits(&self) -> usize {
        self.inner.semaphore.available_permits()
    }

    /// Gets the maximum number of concurrent jobs configured.
    pub fn max_concurrent_jobs(&self) -> usize {
        self.inner.config.max_concurrent_jobs
    }

    /// Gets the current number of jobs being processed.
    ///
    /// This is calculated as: max_concurrent_jobs - available_permits
    pub fn active_job_count(&self) -> usize {
        self.inner.config.max_concurrent_jobs - self.inner.semaphore.available_permits()
    }
}
