//! Nominator and Nomination Records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A controlled nominator account the service issues nominations from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nominator {
    /// Signing address (the proxy or controller key)
    pub address: String,
    /// Stash the nominations are bonded from
    pub stash: String,
    /// Proxy delegate address, when nominations go through a proxy
    pub proxy: Option<String>,
    /// Bonded amount in the smallest chain unit
    pub bonded: u128,
    /// Candidates most recently nominated
    pub current: Vec<String>,
    pub last_nomination: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Nominator {
    pub fn new(address: impl Into<String>, stash: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            stash: stash.into(),
            proxy: None,
            bonded: 0,
            current: Vec::new(),
            last_nomination: None,
            created_at: Utc::now(),
        }
    }
}

/// A nomination the service submitted, keyed by (address, era).
/// Once `block_hash` is set the row is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nomination {
    pub address: String,
    pub era: u32,
    pub validators: Vec<String>,
    pub bonded: u128,
    pub block_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
}
