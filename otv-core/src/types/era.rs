//! Era-Scoped Records
//!
//! Era points, their per-era aggregates and the daily fleet
//! statistics. Era rows are write-once after first successful
//! population; later observations may only upgrade a partially
//! populated row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Productivity counter for one validator in one era
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraPointsRecord {
    pub era: u32,
    pub address: String,
    pub era_points: u64,
}

/// Era points of one validator inside a [`TotalEraPoints`] aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorEraPoints {
    pub address: String,
    pub era_points: u64,
}

/// Per-era aggregate over all validators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalEraPoints {
    pub era: u32,
    pub total_era_points: u64,
    pub validators_era_points: Vec<ValidatorEraPoints>,
    pub median: Option<u64>,
    pub average: Option<f64>,
    pub max: Option<u64>,
    pub min: Option<u64>,
}

/// Daily snapshot of the candidate fleet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraStats {
    pub era: u32,
    pub when: DateTime<Utc>,
    pub total_nodes: u32,
    pub valid: u32,
    pub active: u32,
}
