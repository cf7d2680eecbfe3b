//! Spreads batches of owner jobs across a time window.

use chrono::{DateTime, Duration, Utc};

use crate::model::worker::WorkerJob;

/// Pairs each job with an execution time spread evenly across the window.
///
/// The first job runs immediately and the rest follow at equal offsets
/// computed as `(index * window) / total`, which keeps every job inside
/// the window no matter how many there are. Order is preserved.
pub fn stagger(jobs: Vec<WorkerJob>, window: Duration) -> Vec<(WorkerJob, DateTime<Utc>)> {
    if jobs.is_empty() {
        return Vec::new();
    }

    let num_jobs = jobs.len() as i64;
    let window_seconds = window.num_seconds();
    let base_time = Utc::now();

    jobs.into_iter()
        .enumerate()
        .map(|(index, job)| {
            let offset_seconds = (index as i64 * window_seconds) / num_jobs;
            (job, base_time + Duration::seconds(offset_seconds))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync_jobs(count: i32) -> Vec<WorkerJob> {
        (1..=count)
            .map(|owner_id| WorkerJob::SyncBlueprints { owner_id })
            .collect()
    }

    /// Should return nothing for an empty batch
    #[test]
    fn empty_batch_stays_empty() {
        let scheduled = stagger(Vec::new(), Duration::minutes(10));

        assert!(scheduled.is_empty());
    }

    /// Should run the first job immediately and space the rest evenly
    #[test]
    fn jobs_are_spaced_evenly() {
        let before = Utc::now();
        let scheduled = stagger(sync_jobs(4), Duration::minutes(10));

        assert_eq!(scheduled.len(), 4);
        let offsets: Vec<i64> = scheduled
            .iter()
            .map(|(_, time)| (*time - before).num_seconds())
            .collect();
        assert_eq!(offsets, vec![0, 150, 300, 450]);
    }

    /// Should keep every job inside the window
    #[test]
    fn jobs_stay_inside_the_window() {
        let before = Utc::now();
        let scheduled = stagger(sync_jobs(7), Duration::minutes(10));

        for (_, time) in &scheduled {
            assert!((*time - before).num_seconds() < 600);
        }
    }

    /// Should preserve the order jobs were handed in
    #[test]
    fn order_is_preserved() {
        let scheduled = stagger(sync_jobs(3), Duration::minutes(10));

        let owner_ids: Vec<i32> = scheduled
            .iter()
            .map(|(job, _)| match job {
                WorkerJob::SyncBlueprints { owner_id } => *owner_id,
                _ => panic!("unexpected job variant"),
            })
            .collect();
        assert_eq!(owner_ids, vec![1, 2, 3]);
    }
}
