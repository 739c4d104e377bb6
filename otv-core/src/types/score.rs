//! Validator Scores
//!
//! The latest weighted score per candidate and the statistics
//! snapshot the scoring pass derived it from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-component statistics over the valid candidate population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentStats {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub median: f64,
}

/// The latest score of one candidate, with component subscores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorScore {
    pub address: String,
    pub updated: DateTime<Utc>,
    pub inclusion: f64,
    pub span_inclusion: f64,
    pub discovered: f64,
    pub nominated: f64,
    pub rank: f64,
    pub unclaimed: f64,
    pub bonded: f64,
    pub faults: f64,
    pub offline: f64,
    pub ext_nominations: f64,
    /// Tie-breaking multiplier drawn per scoring pass
    pub randomness: f64,
    /// Weighted sum of the component subscores
    pub aggregate: f64,
    /// `aggregate * randomness`
    pub total: f64,
}

/// Snapshot of the statistics and weights used by the last scoring pass.
/// Stored as a singleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorScoreMetadata {
    pub updated: DateTime<Utc>,
    pub bonded_stats: ComponentStats,
    pub bonded_weight: f64,
    pub faults_stats: ComponentStats,
    pub faults_weight: f64,
    pub inclusion_stats: ComponentStats,
    pub inclusion_weight: f64,
    pub span_inclusion_stats: ComponentStats,
    pub span_inclusion_weight: f64,
    pub discovered_at_stats: ComponentStats,
    pub discovered_weight: f64,
    pub nominated_at_stats: ComponentStats,
    pub nominated_weight: f64,
    pub offline_stats: ComponentStats,
    pub offline_weight: f64,
    pub rank_stats: ComponentStats,
    pub rank_weight: f64,
    pub unclaimed_stats: ComponentStats,
    pub unclaimed_weight: f64,
    pub ext_nominations_stats: ComponentStats,
    pub ext_nominations_weight: f64,
}
