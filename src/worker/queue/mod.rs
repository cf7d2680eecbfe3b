//! Worker queue for Brokkr's interval window scheduler
//!
//! Sync jobs are scheduled in windows where the jobs are staggered evenly to
//! prevent bursts of ESI calls. This queue orders jobs by scheduled time and
//! provides methods to push and schedule jobs.
//!
//! ## Duplicate Guardrails
//! The following guardrails prevent the duplicate scheduling of jobs:
//!
//! 1. [`WorkerQueue::push`] & [`WorkerQueue::schedule`] refuse jobs whose identity
//!    is already queued or currently executing, so an owner mid-sync is never synced
//!    a second time concurrently
//! 2. [`WorkerQueue::get_all_of_type`]: retrieve all worker jobs of a type, you can
//!    then extract the IDs to prevent retrieving duplicate IDs from the database
//!
//! ## TTL and Cleanup
//!
//! Jobs have a 24-hour TTL and are automatically cleaned up:
//! - A background task started via [`WorkerQueue::start_cleanup`] runs on an interval
//! - Manual cleanup can be triggered via [`WorkerQueue::cleanup_stale_jobs`]
//! - Stale jobs (older than TTL) are removed to prevent queue bloat

mod config;

#[cfg(test)]
mod tests;

pub use config::WorkerQueueConfig;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::model::worker::WorkerJob;

/// Time-ordered job queue with duplicate suppression
///
/// Cloning is cheap; all clones share the same queue state.
#[derive(Clone)]
pub struct WorkerQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    config: WorkerQueueConfig,
    state: Mutex<QueueState>,
    cleanup_handle: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

#[derive(Default)]
struct QueueState {
    /// Monotonic tiebreaker so jobs scheduled at the same millisecond keep FIFO order
    sequence: u64,
    /// Jobs keyed by (scheduled time in epoch millis, insertion sequence)
    by_time: BTreeMap<(i64, u64), (WorkerJob, DateTime<Utc>)>,
    /// Identity to time key, for duplicate checks and cleanup
    by_identity: HashMap<String, (i64, u64)>,
    /// Identities popped but not yet finished executing
    in_flight: HashSet<String>,
}

/// A job with its scheduled execution time
pub struct QueuedJob {
    pub job: WorkerJob,
    pub scheduled_at: DateTime<Utc>,
}

/// Reserves a popped job's identity until dropped
///
/// While the guard lives, [`WorkerQueue::push`] and [`WorkerQueue::schedule`]
/// refuse jobs with the same identity. Hold it for the duration of the job and
/// drop it before requeueing a retry, otherwise the retry suppresses itself.
/// Dropping on panic releases the identity too.
pub struct InFlightGuard {
    inner: Arc<QueueInner>,
    identity: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut state = lock_state(&self.inner.state);
        state.in_flight.remove(&self.identity);
    }
}

/// Every mutation completes before the lock is released, so state is
/// consistent even when a previous holder panicked.
fn lock_state(state: &Mutex<QueueState>) -> MutexGuard<'_, QueueState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl WorkerQueue {
    pub fn new() -> Self {
        Self::with_config(WorkerQueueConfig::default())
    }

    pub fn with_config(config: WorkerQueueConfig) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                config,
                state: Mutex::new(QueueState::default()),
                cleanup_handle: tokio::sync::Mutex::new(None),
            }),
        }
    }

    /// Push a job to be executed as soon as possible
    ///
    /// Jobs with the same identity will not be added if they already exist in
    /// the queue or are currently executing.
    ///
    /// # Returns
    ///
    /// Returns `true` if the job was added to the queue.
    /// Returns `false` if a duplicate is queued or in flight.
    pub fn push(&self, job: WorkerJob) -> bool {
        self.schedule(job, Utc::now())
    }

    /// Schedule a job to be executed at the provided time
    ///
    /// Applies the same duplicate rules as [`WorkerQueue::push`].
    pub fn schedule(&self, job: WorkerJob, time: DateTime<Utc>) -> bool {
        let identity = job.identity();
        let mut state = lock_state(&self.inner.state);

        if state.by_identity.contains_key(&identity) || state.in_flight.contains(&identity) {
            return false;
        }

        let key = (time.timestamp_millis(), state.sequence);
        state.sequence += 1;
        state.by_time.insert(key, (job, time));
        state.by_identity.insert(identity, key);

        true
    }

    /// Retrieve the earliest due job from the queue
    ///
    /// Jobs scheduled in the future are not returned until their time passes.
    /// The returned [`InFlightGuard`] keeps the job's identity reserved while
    /// the job runs; see the guard's docs for drop ordering with retries.
    pub fn pop(&self) -> Option<(WorkerJob, InFlightGuard)> {
        let now = Utc::now().timestamp_millis();
        let mut state = lock_state(&self.inner.state);

        let due = matches!(state.by_time.first_key_value(), Some((key, _)) if key.0 <= now);
        if !due {
            return None;
        }

        let (_, (job, _)) = state.by_time.pop_first()?;
        let identity = job.identity();
        state.by_identity.remove(&identity);
        state.in_flight.insert(identity.clone());

        Some((
            job,
            InFlightGuard {
                inner: Arc::clone(&self.inner),
                identity,
            },
        ))
    }

    /// Retrieve all worker jobs of a type without removing them from the queue
    ///
    /// The field values of `job` are ignored, only the variant matters.
    pub fn get_all_of_type(&self, job: &WorkerJob) -> Vec<QueuedJob> {
        let state = lock_state(&self.inner.state);

        state
            .by_time
            .values()
            .filter(|(queued, _)| mem::discriminant(queued) == mem::discriminant(job))
            .map(|(queued, scheduled_at)| QueuedJob {
                job: queued.clone(),
                scheduled_at: *scheduled_at,
            })
            .collect()
    }

    /// Number of jobs currently queued, not counting in-flight jobs
    pub fn len(&self) -> usize {
        lock_state(&self.inner.state).by_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all jobs older than the configured TTL from the queue
    ///
    /// Runs periodically once [`WorkerQueue::start_cleanup`] has been called,
    /// but can also be called manually for immediate cleanup.
    ///
    /// # Returns
    /// Returns the number of stale jobs that were removed from the queue.
    pub fn cleanup_stale_jobs(&self) -> u64 {
        let ttl_ms = self.inner.config.job_ttl.as_millis() as i64;
        let cutoff = Utc::now().timestamp_millis() - ttl_ms;
        let mut state = lock_state(&self.inner.state);

        // split_off keeps everything at or after the cutoff
        let live = state.by_time.split_off(&(cutoff, 0));
        let stale = mem::replace(&mut state.by_time, live);

        for (job, _) in stale.values() {
            state.by_identity.remove(&job.identity());
        }

        let removed = stale.len() as u64;
        if removed > 0 {
            tracing::info!("Cleaned up {} stale jobs from queue", removed);
        }

        removed
    }

    /// Start the background cleanup task
    ///
    /// Does nothing if the cleanup task is already running.
    pub async fn start_cleanup(&self) {
        let mut handle = self.inner.cleanup_handle.lock().await;
        if handle.is_some() {
            return;
        }

        let queue = self.clone();
        let interval = self.inner.config.cleanup_interval;
        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately, skip it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                queue.cleanup_stale_jobs();
            }
        }));
    }

    /// Stop the background cleanup task
    pub async fn stop_cleanup(&self) {
        let mut handle = self.inner.cleanup_handle.lock().await;
        if let Some(task) = handle.take() {
            task.abort();
        }
    }
}

impl Default for WorkerQueue {
    fn default() -> Self {
        Self::new()
    }
}
