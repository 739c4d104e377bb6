//! Invalidity Model
//!
//! A candidate that currently fails the program rules carries one
//! typed verdict per reason. The set of reasons is closed, and the
//! map representation makes "at most one entry per type" structural
//! rather than a convention the writers have to uphold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The closed set of reasons a candidate can be invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidityType {
    /// Node seen online recently
    Online,
    /// Chain shows a validate intent
    ValidateIntention,
    /// Client version matches the latest release within the grace window
    ClientUpgrade,
    /// Uptime exceeds the program minimum
    ConnectionTime,
    /// On-chain identity is set and verified
    Identity,
    /// Accumulated offline time stays under the weekly cap
    AccumulatedOfflineTime,
    /// Reward destination is "Staked"
    RewardDestination,
    // Historical spelling kept for stored data compatibility.
    #[serde(rename = "COMMISION")]
    Commission,
    /// Self bond at or above the program minimum
    SelfStake,
    /// No unclaimed reward era older than the network threshold
    UnclaimedRewards,
    /// Candidate does not block external nominations
    Blocked,
    /// Sibling-chain rank above the program minimum
    KusamaRank,
}

impl InvalidityType {
    /// All types, in evaluation order
    pub const ALL: [InvalidityType; 12] = [
        InvalidityType::Online,
        InvalidityType::ValidateIntention,
        InvalidityType::ClientUpgrade,
        InvalidityType::ConnectionTime,
        InvalidityType::Identity,
        InvalidityType::AccumulatedOfflineTime,
        InvalidityType::RewardDestination,
        InvalidityType::Commission,
        InvalidityType::SelfStake,
        InvalidityType::UnclaimedRewards,
        InvalidityType::Blocked,
        InvalidityType::KusamaRank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::ValidateIntention => "VALIDATE_INTENTION",
            Self::ClientUpgrade => "CLIENT_UPGRADE",
            Self::ConnectionTime => "CONNECTION_TIME",
            Self::Identity => "IDENTITY",
            Self::AccumulatedOfflineTime => "ACCUMULATED_OFFLINE_TIME",
            Self::RewardDestination => "REWARD_DESTINATION",
            Self::Commission => "COMMISION",
            Self::SelfStake => "SELF_STAKE",
            Self::UnclaimedRewards => "UNCLAIMED_REWARDS",
            Self::Blocked => "BLOCKED",
            Self::KusamaRank => "KUSAMA_RANK",
        }
    }
}

impl std::fmt::Display for InvalidityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single verdict for one invalidity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidityEntry {
    /// Whether the candidate passes this check
    pub valid: bool,
    /// When the verdict was last written
    pub updated: DateTime<Utc>,
    /// Human-readable failure message (empty when valid)
    pub details: String,
}

/// The full verdict set for a candidate, keyed by type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvaliditySet(BTreeMap<InvalidityType, InvalidityEntry>);

impl InvaliditySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `kind` with a fresh verdict
    pub fn set(&mut self, kind: InvalidityType, valid: bool, details: impl Into<String>) {
        self.0.insert(
            kind,
            InvalidityEntry {
                valid,
                updated: Utc::now(),
                details: details.into(),
            },
        );
    }

    pub fn get(&self, kind: InvalidityType) -> Option<&InvalidityEntry> {
        self.0.get(&kind)
    }

    /// Conjunction of all recorded verdicts
    pub fn all_valid(&self) -> bool {
        self.0.values().all(|entry| entry.valid)
    }

    /// Messages of the currently failing checks
    pub fn failure_messages(&self) -> Vec<&str> {
        self.0
            .values()
            .filter(|entry| !entry.valid)
            .map(|entry| entry.details.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InvalidityType, &InvalidityEntry)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_entry_of_same_type() {
        let mut set = InvaliditySet::new();
        set.set(InvalidityType::Online, true, "");
        set.set(InvalidityType::Identity, false, "identity not verified");
        assert_eq!(set.len(), 2);

        set.set(InvalidityType::Identity, true, "");
        assert_eq!(set.len(), 2);
        assert!(set.get(InvalidityType::Identity).unwrap().valid);
        assert!(set.get(InvalidityType::Online).unwrap().valid);
    }

    #[test]
    fn test_all_valid_is_conjunction() {
        let mut set = InvaliditySet::new();
        assert!(set.all_valid());

        set.set(InvalidityType::Online, true, "");
        assert!(set.all_valid());

        set.set(InvalidityType::Commission, false, "commission above cap");
        assert!(!set.all_valid());
        assert_eq!(set.failure_messages(), vec!["commission above cap"]);
    }

    #[test]
    fn test_commission_wire_tag() {
        let json = serde_json::to_string(&InvalidityType::Commission).unwrap();
        assert_eq!(json, "\"COMMISION\"");
        let parsed: InvalidityType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, InvalidityType::Commission);
    }

    #[test]
    fn test_closed_set_size() {
        assert_eq!(InvalidityType::ALL.len(), 12);
    }
}
