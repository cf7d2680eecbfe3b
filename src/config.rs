//! Runtime configuration read from the environment.

use crate::error::config::ConfigError;

/// Tuning knobs shared by the sync services.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Remaining-error floor below which authenticated sync work is deferred
    pub error_limit_threshold: i32,
    /// Resolved locations older than this are looked up again on next use
    pub location_stale_hours: i64,
    /// Failed location shells younger than this are not retried
    pub location_empty_grace_minutes: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            error_limit_threshold: 25,
            location_stale_hours: 24,
            location_empty_grace_minutes: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// User agent sent to ESI, CCP requires contact details in it
    pub user_agent: String,
    pub esi_client_id: String,
    pub esi_client_secret: String,
    /// Override for the ESI base URL, mainly for pointing at a mock server
    pub esi_base_url: Option<String>,
    /// Maximum number of sync jobs executing at once
    pub workers: usize,
    pub sync: SyncConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: require_env("DATABASE_URL")?,
            user_agent: require_env("ESI_USER_AGENT")?,
            esi_client_id: require_env("ESI_CLIENT_ID")?,
            esi_client_secret: require_env("ESI_CLIENT_SECRET")?,
            esi_base_url: std::env::var("ESI_BASE_URL").ok(),
            workers: parse_env_or("BROKKR_WORKERS", 4)?,
            sync: SyncConfig::default(),
        })
    }
}

fn require_env(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: format!("could not parse {:?}", value),
        }),
        Err(_) => Ok(default),
    }
}
