//! Core Error Types

use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A cron expression failed to parse
    #[error("Invalid cron expression for {job}: {reason}")]
    InvalidCron { job: String, reason: String },

    /// A threshold or weight is out of its valid range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
