mod cleanup_stale_jobs;
mod scheduling;
