//! Store Error Types

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found where one is required
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Backend failure (sled I/O, corruption)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Entity (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store could not be opened at boot
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Store result type
pub type StoreResult<T> = Result<T, StoreError>;
