//! OTV Core - Validator Program Shared Types
//!
//! This crate provides the shared vocabulary of the validator program
//! backend:
//! - The persisted data model (candidates, nominators, eras, scores)
//! - The invalidity model (one typed verdict per reason)
//! - Configuration and the default cron/threshold tables
//! - Telemetry (tracing) initialization
//!
//! Everything that crosses a crate boundary lives here so that the
//! store, the chain adapter, the constraint evaluator and the job
//! catalog agree on one set of records.

pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use types::*;
