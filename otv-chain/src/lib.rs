//! OTV Chain - Chain Adapter Interfaces
//!
//! Pull-only chain access and the injected capabilities the action
//! jobs consume. The raw RPC client lives outside the core; this
//! crate defines the seams plus an in-memory mock harness used by the
//! evaluator and job tests.

pub mod capabilities;
pub mod error;
pub mod mock;
pub mod provider;
pub mod types;

pub use capabilities::{Bot, NominatorAccount, RewardClaimer};
pub use error::{ChainError, ChainResult};
pub use provider::ChainProvider;
pub use types::{
    ChainNomination, EraPointsTotals, EraReward, NominatorSnapshot, ProxyAnnouncement, QueuedKeys,
};
