//! Bounded retry with exponential backoff for job execution.
//!
//! Transient failures (network errors, gateway errors from ESI, dropped
//! database connections) get a few in-process attempts before the job is
//! given up for this cycle. Deferrals from the status gate are not retried
//! here; the worker pool reschedules those with the countdown the error
//! carries.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::{retry::ErrorRetryStrategy, Error};

/// Milliseconds of random jitter added to each backoff sleep so concurrent
/// jobs that failed together do not retry together.
const RETRY_BACKOFF_MAX_JITTER_MS: u64 = 250;

/// Executes an operation with bounded retries and exponential backoff.
///
/// Errors are classified through `to_retry_strategy()`: `Retry` sleeps and
/// runs the operation again up to `max_attempts` times (1s, 2s, 4s, ...,
/// jittered); `RetryIn` and `Fail` return immediately. Operations are
/// re-run from the start, so they must be idempotent.
pub struct RetryContext {
    /// Maximum number of attempts before giving up
    max_attempts: u32,
    /// Initial backoff duration in seconds (doubles with each retry)
    initial_backoff_secs: u64,
}

impl RetryContext {
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 1;

    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_backoff_secs: Self::DEFAULT_INITIAL_BACKOFF_SECS,
        }
    }

    /// Runs `operation` until it succeeds, fails permanently, or exhausts
    /// the attempt budget.
    ///
    /// # Arguments
    /// - `description` - Human-readable description for logging
    /// - `operation` - Closure producing a fresh future per attempt
    pub async fn execute_with_retry<R, F, Fut>(
        &self,
        description: &str,
        operation: F,
    ) -> Result<R, Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            match operation().await {
                Ok(result) => {
                    tracing::debug!("Successfully processed {}", description);
                    return Ok(result);
                }
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= self.max_attempts {
                            tracing::error!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                self.max_attempts,
                                description,
                                e
                            );
                            return Err(e);
                        }

                        let backoff_secs =
                            self.initial_backoff_secs * 2_u64.pow(attempt_count - 1);
                        let jitter_ms =
                            rand::rng().random_range(0..=RETRY_BACKOFF_MAX_JITTER_MS);
                        let backoff = Duration::from_millis(backoff_secs * 1000 + jitter_ms);

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description,
                            attempt_count,
                            self.max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                    // Deferrals and permanent failures go back to the caller
                    // untouched
                    _ => return Err(e),
                },
            }
        }
    }
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}
