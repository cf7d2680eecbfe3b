//! Tests for WorkerQueue::cleanup_stale_jobs method
//!
//! These tests verify the cleanup_stale_jobs method's behavior including:
//! - Removing stale jobs older than TTL
//! - Preserving recent jobs within TTL
//! - Handling empty queues
//! - Handling mixed old and new jobs
//! - Returning correct count of removed jobs
//! - Freeing the identity so the job can be queued again

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use crate::model::worker::WorkerJob;
use crate::worker::queue::{WorkerQueue, WorkerQueueConfig};

fn queue_with_ttl_hours(hours: u64) -> WorkerQueue {
    WorkerQueue::with_config(WorkerQueueConfig {
        job_ttl: StdDuration::from_secs(hours * 60 * 60),
        ..WorkerQueueConfig::default()
    })
}

#[test]
fn test_cleanup_empty_queue() {
    let queue = WorkerQueue::new();

    assert_eq!(
        queue.cleanup_stale_jobs(),
        0,
        "Should remove 0 jobs from empty queue"
    );
}

#[test]
fn test_cleanup_removes_stale_job() {
    let queue = queue_with_ttl_hours(24);
    let job = WorkerJob::SyncBlueprints { owner_id: 12_345 };

    let stale_time = Utc::now() - Duration::hours(24) - Duration::minutes(1);
    assert!(queue.schedule(job, stale_time));
    assert_eq!(queue.len(), 1, "Queue should have 1 job before cleanup");

    assert_eq!(queue.cleanup_stale_jobs(), 1, "Should remove 1 stale job");
    assert_eq!(queue.len(), 0, "Queue should be empty after cleanup");
}

#[test]
fn test_cleanup_preserves_recent_jobs() {
    let queue = queue_with_ttl_hours(24);
    let job = WorkerJob::SyncIndustryJobs { owner_id: 7 };

    assert!(queue.schedule(job, Utc::now() - Duration::hours(1)));

    assert_eq!(queue.cleanup_stale_jobs(), 0, "Recent job should survive");
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_cleanup_mixed_old_and_new_jobs() {
    let queue = queue_with_ttl_hours(24);
    let stale_time = Utc::now() - Duration::hours(25);
    let recent_time = Utc::now() - Duration::minutes(5);

    assert!(queue.schedule(WorkerJob::SyncBlueprints { owner_id: 1 }, stale_time));
    assert!(queue.schedule(WorkerJob::SyncLocations { owner_id: 2 }, stale_time));
    assert!(queue.schedule(WorkerJob::SyncBlueprints { owner_id: 3 }, recent_time));

    assert_eq!(
        queue.cleanup_stale_jobs(),
        2,
        "Should remove only the stale jobs"
    );
    assert_eq!(queue.len(), 1, "Recent job should remain");

    let (remaining, _guard) = queue.pop().expect("Recent job should still be due");
    assert_eq!(remaining, WorkerJob::SyncBlueprints { owner_id: 3 });
}

/// A cleaned up job's identity must be free for requeueing
#[test]
fn test_cleanup_frees_identity() {
    let queue = queue_with_ttl_hours(24);
    let job = WorkerJob::SyncLocations { owner_id: 42 };

    assert!(queue.schedule(job.clone(), Utc::now() - Duration::hours(25)));
    assert_eq!(queue.cleanup_stale_jobs(), 1);

    assert!(
        queue.push(job),
        "Job should be accepted again after its stale copy was removed"
    );
}
