//! Candidate Record
//!
//! A candidate is a validator enrolled in the program. The record is
//! created by configuration ingestion or by first telemetry sighting,
//! refreshed field by field by the periodic jobs, and never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::invalidity::InvaliditySet;

/// On-chain identity as resolved by the chain adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainIdentity {
    /// Display name of the identity (or its parent)
    pub name: String,
    /// Sub-identity label, if the address is a sub-account
    pub sub: Option<String>,
    /// Whether a registrar judged the identity reasonable/known-good
    pub verified: bool,
}

/// Where staking rewards are paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardDestination {
    Staked,
    Stash,
    Controller,
    Account(String),
    None,
}

impl std::fmt::Display for RewardDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Staked => write!(f, "Staked"),
            Self::Stash => write!(f, "Stash"),
            Self::Controller => write!(f, "Controller"),
            Self::Account(addr) => write!(f, "Account({})", addr),
            Self::None => write!(f, "None"),
        }
    }
}

/// An era in which the candidate held a rank increase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEvent {
    pub when: DateTime<Utc>,
    pub start_era: u32,
    pub active_era: u32,
}

/// A recorded fault with the rank it interrupted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultEvent {
    pub when: DateTime<Utc>,
    pub reason: String,
    pub prev_rank: i64,
}

/// A validator enrolled in the program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique human label from the program configuration / telemetry
    pub name: String,
    /// Primary on-chain stash address
    pub stash: String,
    /// Stash on the sibling chain, when the operator also runs there
    pub kusama_stash: Option<String>,

    // Derived validator attributes, refreshed from chain
    /// Commission in percent (scaled down from raw parts-per-billion)
    pub commission: f64,
    pub controller: Option<String>,
    pub reward_destination: Option<RewardDestination>,
    /// Bonded amount in the smallest chain unit
    pub bonded: Option<u128>,
    pub queued_keys: Option<String>,
    pub next_keys: Option<String>,
    pub identity: Option<ChainIdentity>,

    // Operational state, driven by telemetry
    pub discovered_at: Option<DateTime<Utc>>,
    pub online_since: Option<DateTime<Utc>>,
    pub offline_since: Option<DateTime<Utc>>,
    /// Total offline time in milliseconds since the last weekly reset
    pub offline_accumulated: i64,
    /// Number of live telemetry sessions reporting under this name
    pub node_refs: u32,
    pub version: Option<String>,
    pub telemetry_id: Option<u64>,
    /// Whether the reported version matches the latest release
    pub updated: bool,
    pub nominated_at: Option<DateTime<Utc>>,
    /// Rank on the sibling-chain program, ingested externally
    pub kusama_rank: Option<i64>,

    // Evaluation state
    /// Member of the current validator set
    pub active: bool,
    /// Conjunction of all invalidity verdicts
    pub valid: bool,
    pub rank: i64,
    pub faults: i64,
    /// Fraction of the last 84 eras the candidate was active in
    pub inclusion: f64,
    /// Fraction of the last 28 eras the candidate was active in
    pub span_inclusion: f64,
    /// Era indices with unclaimed rewards
    pub unclaimed_eras: Vec<u32>,
    pub invalidity: InvaliditySet,
    pub rank_events: Vec<RankEvent>,
    pub fault_events: Vec<FaultEvent>,
}

impl Candidate {
    /// Create a bare candidate as configuration ingestion does
    pub fn new(name: impl Into<String>, stash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stash: stash.into(),
            kusama_stash: None,
            commission: 0.0,
            controller: None,
            reward_destination: None,
            bonded: None,
            queued_keys: None,
            next_keys: None,
            identity: None,
            discovered_at: None,
            online_since: None,
            offline_since: None,
            offline_accumulated: 0,
            node_refs: 0,
            version: None,
            telemetry_id: None,
            updated: false,
            nominated_at: None,
            kusama_rank: None,
            active: false,
            valid: false,
            rank: 0,
            faults: 0,
            inclusion: 0.0,
            span_inclusion: 0.0,
            unclaimed_eras: Vec::new(),
            invalidity: InvaliditySet::new(),
            rank_events: Vec::new(),
            fault_events: Vec::new(),
        }
    }

    /// Whether the node is currently reporting to telemetry
    pub fn is_online(&self) -> bool {
        self.online_since.is_some() && self.offline_since.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_candidate_defaults() {
        let candidate = Candidate::new("Alice", "5GrwvaEF");
        assert_eq!(candidate.name, "Alice");
        assert_eq!(candidate.stash, "5GrwvaEF");
        assert!(!candidate.valid);
        assert!(!candidate.is_online());
        assert!(candidate.invalidity.is_empty());
    }

    #[test]
    fn test_is_online() {
        let mut candidate = Candidate::new("Alice", "5GrwvaEF");
        candidate.online_since = Some(Utc::now());
        assert!(candidate.is_online());

        candidate.offline_since = Some(Utc::now());
        assert!(!candidate.is_online());
    }

    #[test]
    fn test_reward_destination_display() {
        assert_eq!(RewardDestination::Staked.to_string(), "Staked");
        assert_eq!(
            RewardDestination::Account("5Abc".into()).to_string(),
            "Account(5Abc)"
        );
    }
}
