//! Error types for the Brokkr application.
//!
//! Domain errors (configuration, authorization, ESI, tokens) each get their
//! own enum and are aggregated into a single [`Error`] via `thiserror`'s
//! transparent conversions so any layer can use `?`.

pub mod auth;
pub mod config;
pub mod esi;
pub mod retry;
pub mod token;

use thiserror::Error;

use crate::error::{auth::AuthError, config::ConfigError, esi::EsiError, token::TokenError};

/// Represents all possible errors within Brokkr
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors from missing or invalid environment variables
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authorization errors for user-facing operations
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// ESI transport, status gate, and SSO errors
    #[error(transparent)]
    EsiError(#[from] EsiError),
    /// Token resolution errors for an owner's sync cycle
    #[error(transparent)]
    TokenError(#[from] TokenError),
    /// Errors related to parsing of values
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal errors indicating a bug in Brokkr's code
    #[error(
        "Internal error with Brokkr's code, please open a GitHub issue as this indicates a bug: {0:?}"
    )]
    InternalError(String),
    /// A referenced owner does not exist
    #[error("Owner {0} not found")]
    OwnerNotFound(i32),
    /// A referenced blueprint does not exist
    #[error("Blueprint {0} not found")]
    BlueprintNotFound(i64),
    /// A referenced blueprint request does not exist
    #[error("Request {0} not found")]
    RequestNotFound(i32),
    /// Database errors
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Cron scheduler errors
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}
