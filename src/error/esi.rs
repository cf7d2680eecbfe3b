use thiserror::Error;

/// Errors raised by the ESI client.
///
/// [`EsiError::Offline`] and [`EsiError::ErrorLimitExceeded`] come from the
/// server status gate checked before token-bearing requests; job handlers
/// reschedule the affected job for later instead of failing it.
#[derive(Error, Debug)]
pub enum EsiError {
    /// ESI reported VIP mode, a non-success status, or could not be reached
    #[error("ESI is offline or unreachable")]
    Offline,
    /// The remaining ESI error budget dropped to or below the configured threshold
    #[error("ESI error limit nearly exhausted ({remain} errors remaining), deferring for {retry_in}s")]
    ErrorLimitExceeded { remain: i32, retry_in: i64 },
    /// ESI rejected the request with 401
    #[error("ESI request to {path:?} was rejected as unauthorized")]
    Unauthorized { path: String },
    /// ESI rejected the request with 403
    #[error("ESI request to {path:?} was rejected as forbidden")]
    Forbidden { path: String },
    /// ESI returned any other non-success status
    #[error("ESI request to {path:?} failed with status {status}")]
    Http { status: u16, path: String },
    /// EVE SSO rejected a token refresh
    #[error("EVE SSO token refresh failed with status {status}")]
    OAuth { status: u16 },
    /// The client was built without SSO credentials but a token refresh was attempted
    #[error("ESI client has no SSO client credentials configured")]
    MissingCredentials,
    /// The client builder was missing a required field
    #[error("Failed to build ESI client: {0}")]
    Builder(String),
    /// Transport-level errors from reqwest (connect, timeout, decode)
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
}
