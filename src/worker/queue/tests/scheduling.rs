//! Tests for WorkerQueue scheduling and retrieval
//!
//! These tests verify pop ordering and the type filter:
//! - Empty queue returns no job
//! - Future-scheduled jobs are held back until due
//! - Due jobs come out earliest first
//! - get_all_of_type filters by variant without draining the queue

use chrono::{Duration, Utc};

use crate::model::worker::WorkerJob;
use crate::worker::queue::WorkerQueue;

#[test]
fn test_pop_empty_queue_returns_none() {
    let queue = WorkerQueue::new();

    assert!(queue.pop().is_none(), "Empty queue should return no job");
}

#[test]
fn test_pop_holds_back_future_jobs() {
    let queue = WorkerQueue::new();
    let job = WorkerJob::SyncBlueprints { owner_id: 1 };

    assert!(queue.schedule(job, Utc::now() + Duration::minutes(30)));

    assert!(
        queue.pop().is_none(),
        "Job scheduled in the future should not be returned yet"
    );
    assert_eq!(queue.len(), 1, "Held back job should remain queued");
}

#[test]
fn test_pop_returns_past_scheduled_job() {
    let queue = WorkerQueue::new();
    let job = WorkerJob::SyncBlueprints { owner_id: 1 };

    assert!(queue.schedule(job.clone(), Utc::now() - Duration::seconds(5)));

    let (popped, _guard) = queue.pop().expect("Past-scheduled job should be due");
    assert_eq!(popped, job);
    assert_eq!(queue.len(), 0, "Popped job should be removed from the queue");
}

#[test]
fn test_pop_returns_earliest_job_first() {
    let queue = WorkerQueue::new();
    let earlier = WorkerJob::SyncBlueprints { owner_id: 1 };
    let later = WorkerJob::SyncBlueprints { owner_id: 2 };

    // Insert out of order
    assert!(queue.schedule(later.clone(), Utc::now() - Duration::minutes(1)));
    assert!(queue.schedule(earlier.clone(), Utc::now() - Duration::minutes(10)));

    let (first, _g1) = queue.pop().expect("Should pop first job");
    let (second, _g2) = queue.pop().expect("Should pop second job");
    assert_eq!(first, earlier, "Earliest scheduled job should come out first");
    assert_eq!(second, later);
}

#[test]
fn test_pop_preserves_insertion_order_for_same_time() {
    let queue = WorkerQueue::new();
    let time = Utc::now() - Duration::seconds(1);

    for owner_id in 1..=3 {
        assert!(queue.schedule(WorkerJob::SyncLocations { owner_id }, time));
    }

    for expected_owner in 1..=3 {
        let (job, _guard) = queue.pop().expect("Should pop job");
        assert_eq!(
            job,
            WorkerJob::SyncLocations {
                owner_id: expected_owner
            }
        );
    }
}

#[test]
fn test_get_all_of_type_filters_by_variant() {
    let queue = WorkerQueue::new();

    assert!(queue.push(WorkerJob::SyncBlueprints { owner_id: 1 }));
    assert!(queue.push(WorkerJob::SyncBlueprints { owner_id: 2 }));
    assert!(queue.push(WorkerJob::SyncIndustryJobs { owner_id: 1 }));

    let blueprints = queue.get_all_of_type(&WorkerJob::SyncBlueprints { owner_id: 0 });
    assert_eq!(blueprints.len(), 2, "Should find both blueprint sync jobs");
    for queued in &blueprints {
        assert!(matches!(queued.job, WorkerJob::SyncBlueprints { .. }));
    }

    assert_eq!(queue.len(), 3, "get_all_of_type should not drain the queue");
}

#[test]
fn test_get_all_of_type_includes_future_jobs() {
    let queue = WorkerQueue::new();
    let job = WorkerJob::SyncIndustryJobs { owner_id: 4 };
    let scheduled_at = Utc::now() + Duration::minutes(20);

    assert!(queue.schedule(job, scheduled_at));

    let queued = queue.get_all_of_type(&WorkerJob::SyncIndustryJobs { owner_id: 0 });
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].scheduled_at, scheduled_at);
}
