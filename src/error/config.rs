use thiserror::Error;

/// Errors related to application configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0:?}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {var:?}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
}
