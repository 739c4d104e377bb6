//! OTV Jobs - Scheduler and Job Catalog
//!
//! The periodic-job orchestration engine: a cron scheduler with
//! per-job non-reentrancy latches and the fixed catalog of jobs that
//! keep the candidate records converging against chain state.
//!
//! Jobs never coordinate directly; they share only the store, whose
//! per-record find-and-update contracts make interleaved writes
//! converge over successive ticks.

pub mod catalog;
pub mod context;
pub mod error;
pub mod jobs;
pub mod scheduler;
pub mod testkit;

pub use catalog::register_all;
pub use context::{JobContext, ReleaseFeed};
pub use error::{JobError, JobResult};
pub use scheduler::{JobBody, JobDefinition, Scheduler, SchedulerHandle};
