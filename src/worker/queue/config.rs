use std::time::Duration;

/// Configuration for the worker job queue
///
/// Controls how long unexecuted jobs may sit in the queue before cleanup
/// removes them, and how often the background cleanup task runs.
#[derive(Debug, Clone)]
pub struct WorkerQueueConfig {
    /// Maximum age for jobs in the queue before they're considered stale
    ///
    /// Jobs older than this will be removed by cleanup operations. Applies to
    /// jobs that were never popped, not to jobs actively being retried.
    pub job_ttl: Duration,
    /// Interval between background cleanup runs
    pub cleanup_interval: Duration,
}

impl WorkerQueueConfig {
    const DEFAULT_JOB_TTL_SECS: u64 = 24 * 60 * 60;
    const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 5 * 60;

    pub fn new() -> Self {
        Self {
            job_ttl: Duration::from_secs(Self::DEFAULT_JOB_TTL_SECS),
            cleanup_interval: Duration::from_secs(Self::DEFAULT_CLEANUP_INTERVAL_SECS),
        }
    }
}

impl Default for WorkerQueueConfig {
    fn default() -> Self {
        Self::new()
    }
}
