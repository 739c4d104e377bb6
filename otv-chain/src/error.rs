//! Chain Adapter Error Types

use thiserror::Error;

/// Errors surfaced by the chain adapter. All of them are treated as
/// transient by the jobs: the affected candidate is skipped this tick
/// and retried on the next one.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC transport failure (timeout, disconnect)
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Storage value failed to decode
    #[error("Decode error: {0}")]
    Decode(String),

    /// Queried entity does not exist on chain
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transaction submission was rejected
    #[error("Submission failed: {0}")]
    Submission(String),
}

/// Chain result type
pub type ChainResult<T> = Result<T, ChainError>;
