//! Chain-Shaped Values
//!
//! Read results crossing the adapter boundary that do not live in the
//! persisted data model.

use serde::{Deserialize, Serialize};

use otv_core::types::ValidatorEraPoints;

/// A deferred transaction intent announced through a proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyAnnouncement {
    /// Account the call will be dispatched for
    pub real: String,
    /// Hash of the announced call
    pub call_hash: String,
    /// Block height the announcement was made at
    pub height: u64,
}

/// Queued session keys of one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedKeys {
    pub address: String,
    pub keys: String,
}

/// Era points of every validator in one era, as read from chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraPointsTotals {
    pub era: u32,
    pub total: u64,
    pub validators: Vec<ValidatorEraPoints>,
}

/// An on-chain nomination as seen at a given era
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainNomination {
    pub stash: String,
    pub targets: Vec<String>,
    /// Era the nomination was submitted in
    pub submitted_in: u32,
}

/// One external nominator with its exposure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatorSnapshot {
    pub address: String,
    pub targets: Vec<String>,
    pub bonded: u128,
}

/// An (era, stash) pair with a pending reward payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraReward {
    pub era: u32,
    pub stash: String,
}
