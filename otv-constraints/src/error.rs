//! Constraint Evaluator Error Types

use thiserror::Error;

use otv_chain::ChainError;
use otv_store::StoreError;

/// Errors surfaced while evaluating or scoring candidates
#[derive(Debug, Error)]
pub enum ConstraintsError {
    /// Store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Chain adapter failure; the affected candidate is skipped this tick
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),
}

/// Constraints result type
pub type ConstraintsResult<T> = Result<T, ConstraintsError>;
