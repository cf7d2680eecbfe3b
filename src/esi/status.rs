//! Server status checks and the ESI error limit gate.
//!
//! ESI enforces a rolling error budget per client: exceed it and every request
//! gets rejected until the window resets, repeat offenders risk a ban. Sync
//! services therefore fetch an [`EsiStatus`] snapshot and call
//! [`EsiStatus::raise_for_status`] before spending authenticated requests,
//! deferring work while the server is down or the budget is nearly spent.

use std::time::Duration;

use rand::Rng;

use super::model::ServerStatus;
use super::EsiClient;
use crate::error::esi::EsiError;

/// Retries for the status fetch before ESI counts as offline.
const STATUS_FETCH_RETRIES: u32 = 3;
/// Upper bound of the jitter added to error limit deferrals.
const ERROR_LIMIT_MAX_JITTER_SECONDS: i64 = 20;

/// Snapshot of ESI availability and the remaining error budget.
///
/// Built from the `/status/` response body plus the error limit headers ESI
/// attaches to every response. A status that could not be fetched at all
/// reports offline with no budget information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsiStatus {
    pub online: bool,
    pub error_limit_remain: Option<i32>,
    pub error_limit_reset: Option<i64>,
}

impl EsiStatus {
    fn offline() -> Self {
        Self {
            online: false,
            error_limit_remain: None,
            error_limit_reset: None,
        }
    }

    /// True when the remaining error budget is at or below `threshold`.
    ///
    /// Unknown budgets (missing or unparsable headers) never count as
    /// exceeded, the gate only defers on positive evidence.
    pub fn is_error_limit_exceeded(&self, threshold: i32) -> bool {
        matches!(self.error_limit_remain, Some(remain) if remain <= threshold)
    }

    /// Enforces the gate, erroring when ESI work must be deferred.
    ///
    /// An exhausted budget defers until the reset window plus one to twenty
    /// seconds of jitter so requeued jobs don't return in a single burst.
    pub fn raise_for_status(&self, threshold: i32) -> Result<(), EsiError> {
        if !self.online {
            return Err(EsiError::Offline);
        }

        if let Some(remain) = self.error_limit_remain {
            if remain <= threshold {
                let reset = self.error_limit_reset.unwrap_or(0);
                let jitter = rand::rng().random_range(1..=ERROR_LIMIT_MAX_JITTER_SECONDS);
                return Err(EsiError::ErrorLimitExceeded {
                    remain,
                    retry_in: reset + jitter,
                });
            }
        }

        Ok(())
    }
}

impl EsiClient {
    /// Fetches `/status/` and folds in the error limit headers.
    ///
    /// Gateway errors (502, 503, 504) are retried up to three times with a
    /// short randomized backoff, ESI routinely throws these for a few seconds
    /// around daily downtime. Connection failures, timeouts, exhausted
    /// retries, and a `vip` flag in the body all report as offline rather
    /// than erroring so callers defer work instead of failing it.
    pub async fn get_status(&self) -> Result<EsiStatus, EsiError> {
        let url = format!("{}/status/", self.esi_url);
        let mut retries = 0;

        loop {
            let response = match self.http.get(&url).send().await {
                Ok(response) => response,
                Err(error) if error.is_timeout() || error.is_connect() => {
                    tracing::warn!("ESI status request failed: {}", error);
                    return Ok(EsiStatus::offline());
                }
                Err(error) => return Err(EsiError::ReqwestError(error)),
            };

            let status = response.status();
            if matches!(status.as_u16(), 502 | 503 | 504) {
                if retries < STATUS_FETCH_RETRIES {
                    retries += 1;
                    let backoff =
                        0.1 * rand::rng().random_range(2.0..=4.0_f64).powi(retries as i32 - 1);
                    tokio::time::sleep(Duration::from_secs_f64(backoff)).await;
                    continue;
                }

                tracing::warn!(
                    "ESI status endpoint returned {} after {} retries, treating as offline",
                    status,
                    retries
                );
                return Ok(EsiStatus::offline());
            }

            if !status.is_success() {
                return Err(EsiError::Http {
                    status: status.as_u16(),
                    path: "/status/".to_string(),
                });
            }

            let error_limit_remain = header_value(&response, "x-esi-error-limit-remain");
            let error_limit_reset = header_value(&response, "x-esi-error-limit-reset");
            if error_limit_remain.is_none() || error_limit_reset.is_none() {
                tracing::warn!("ESI error limit headers missing or unparsable");
            }

            let body: ServerStatus = response.json().await?;
            let online = !body.vip.unwrap_or(false);

            return Ok(EsiStatus {
                online,
                error_limit_remain,
                error_limit_reset,
            });
        }
    }
}

fn header_value<T: std::str::FromStr>(response: &reqwest::Response, name: &str) -> Option<T> {
    response
        .headers()
        .get(name)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
