//! Job Error Types

use thiserror::Error;

use otv_chain::ChainError;
use otv_constraints::ConstraintsError;
use otv_store::StoreError;

/// Errors surfaced by job bodies and the scheduler
#[derive(Debug, Error)]
pub enum JobError {
    /// Store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Chain adapter failure
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// Constraint evaluation failure
    #[error("Constraints error: {0}")]
    Constraints(#[from] ConstraintsError),

    /// A cron expression failed to parse at registration
    #[error("Invalid cron expression for {job}: {reason}")]
    InvalidCron { job: String, reason: String },
}

/// Job result type
pub type JobResult<T> = Result<T, JobError>;
