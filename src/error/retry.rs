use rand::Rng;
use sea_orm::DbErr;

use super::{esi::EsiError, Error};

/// Seconds to defer ESI work when the server is offline or unreachable.
const OFFLINE_RETRY_DELAY_SECONDS: i64 = 30 * 60;
/// Upper bound of the jitter added to offline deferrals so requeued jobs
/// don't return in a single burst.
const OFFLINE_RETRY_MAX_JITTER_SECONDS: i64 = 20;

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry after a short fixed delay (server errors)
    Retry,
    /// Retry once the given number of seconds has elapsed (deferrals from the
    /// ESI status gate)
    RetryIn(i64),
    /// Failed permanently (bad request)
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::EsiError(esi_error) => match esi_error {
                // ESI downtime lasts anywhere from minutes to hours, check
                // back on a long interval rather than hammering the ping
                EsiError::Offline => {
                    let jitter = rand::rng().random_range(1..=OFFLINE_RETRY_MAX_JITTER_SECONDS);
                    ErrorRetryStrategy::RetryIn(OFFLINE_RETRY_DELAY_SECONDS + jitter)
                }

                // The status gate already computed a deferral window from the
                // error limit reset header
                EsiError::ErrorLimitExceeded { retry_in, .. } => {
                    ErrorRetryStrategy::RetryIn(*retry_in)
                }

                EsiError::ReqwestError(reqwest_error) => {
                    if let Some(status) = reqwest_error.status() {
                        match status {
                            // 500 - Internal Server Error
                            //
                            // ESI is temporarily unavailable, backoff and retry later
                            s if s.is_server_error() => ErrorRetryStrategy::Retry,

                            // 400 - Client Error
                            // We're making invalid requests to ESI, this is a flaw in
                            // the code that needs to be fixed.
                            s if s.is_client_error() => ErrorRetryStrategy::Fail,

                            // Unexpected response
                            _ => ErrorRetryStrategy::Fail,
                        }
                    } else {
                        // Network error or connection issue - should retry
                        ErrorRetryStrategy::Retry
                    }
                }

                // Non-success statuses that reached us as plain HTTP errors
                EsiError::Http { status, .. } => {
                    if *status >= 500 {
                        ErrorRetryStrategy::Retry
                    } else {
                        ErrorRetryStrategy::Fail
                    }
                }

                // Auth rejections and SSO failures need a fresh token or
                // operator intervention, retrying won't change the answer
                EsiError::Unauthorized { .. }
                | EsiError::Forbidden { .. }
                | EsiError::OAuth { .. }
                | EsiError::MissingCredentials
                | EsiError::Builder(_) => ErrorRetryStrategy::Fail,
            },

            Self::DbErr(db_err) => {
                match db_err {
                    // Connection acquisition errors - transient, should retry
                    DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                    // Connection errors - transient, should retry
                    DbErr::Conn(_) => ErrorRetryStrategy::Retry,

                    // All other database errors are permanent failures:
                    // - Query errors (constraint violations, syntax errors, etc.)
                    // - Type conversion errors
                    // - Schema/migration errors
                    // - Record not found/inserted/updated
                    // These indicate programming bugs or data issues that won't resolve with retry
                    _ => ErrorRetryStrategy::Fail,
                }
            }

            // Token errors - terminal for this cycle, the next scheduled sync
            // retries after the operator re-registers the owner
            Self::TokenError(_) => ErrorRetryStrategy::Fail,

            // Configuration errors - permanent failures, won't resolve with retry
            Self::ConfigError(_) => ErrorRetryStrategy::Fail,

            // Auth errors - permanent failures (bad requests, missing data)
            Self::AuthError(_) => ErrorRetryStrategy::Fail,

            // Parse errors - permanent failures (bad data format)
            Self::ParseError(_) => ErrorRetryStrategy::Fail,

            // InternalError - permanent failures (internal error within Brokkr's code)
            Self::InternalError(_) => ErrorRetryStrategy::Fail,

            // Missing rows referenced by a job - permanent for this job
            Self::OwnerNotFound(_) | Self::BlueprintNotFound(_) | Self::RequestNotFound(_) => {
                ErrorRetryStrategy::Fail
            }

            // Job scheduler errors - permanent failures (configuration issue)
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
