//! Store Interface
//!
//! Defines every find-and-update contract the jobs and the constraint
//! evaluator rely on. All writes address a record by a stable key
//! (candidate name, stash address, era number, composite pairs) and
//! are last-write-wins on that key; writes against a missing
//! candidate are logged no-ops that never create partial records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use otv_core::types::{
    Candidate, ChainIdentity, ChainMetadata, DelayedTx, EraPointsRecord, EraStats, InvalidityType,
    Nomination, Nominator, Release, RewardDestination, TotalEraPoints, ValidatorScore,
    ValidatorScoreMetadata,
};

use crate::error::StoreResult;

/// The persistent store, shared by every job
#[async_trait]
pub trait Store: Send + Sync {
    // ==================== Candidates ====================

    /// Upsert a candidate from configuration ingestion, keyed by name
    async fn add_candidate(
        &self,
        name: &str,
        stash: &str,
        kusama_stash: Option<&str>,
    ) -> StoreResult<()>;

    /// Find a candidate by stash address
    async fn get_candidate(&self, stash: &str) -> StoreResult<Option<Candidate>>;

    /// Find a candidate by its unique name
    async fn get_candidate_by_name(&self, name: &str) -> StoreResult<Option<Candidate>>;

    async fn get_all_candidates(&self) -> StoreResult<Vec<Candidate>>;

    /// Record a telemetry connection under `name`, creating the
    /// candidate on first sighting
    async fn report_online(
        &self,
        name: &str,
        telemetry_id: u64,
        version: &str,
    ) -> StoreResult<()>;

    /// Record a telemetry disconnect under `name`
    async fn report_offline(&self, name: &str) -> StoreResult<()>;

    /// Record a best-block report; the candidate is found by
    /// telemetry id only
    async fn report_best_block(&self, telemetry_id: u64) -> StoreResult<()>;

    async fn set_active(&self, stash: &str, active: bool) -> StoreResult<()>;

    async fn set_identity(&self, stash: &str, identity: ChainIdentity) -> StoreResult<()>;

    /// Store the commission in percent (already scaled)
    async fn set_commission(&self, stash: &str, commission: f64) -> StoreResult<()>;

    async fn set_controller(&self, stash: &str, controller: &str) -> StoreResult<()>;

    async fn set_reward_destination(
        &self,
        stash: &str,
        destination: RewardDestination,
    ) -> StoreResult<()>;

    async fn set_bonded(&self, stash: &str, bonded: u128) -> StoreResult<()>;

    async fn set_queued_keys(&self, stash: &str, keys: &str) -> StoreResult<()>;

    async fn set_next_keys(&self, stash: &str, keys: &str) -> StoreResult<()>;

    async fn set_inclusion(
        &self,
        stash: &str,
        inclusion: f64,
        span_inclusion: f64,
    ) -> StoreResult<()>;

    async fn set_unclaimed_eras(&self, stash: &str, eras: Vec<u32>) -> StoreResult<()>;

    async fn set_nominated_at(&self, stash: &str, when: DateTime<Utc>) -> StoreResult<()>;

    /// Mark whether the candidate runs the latest client release
    async fn set_updated(&self, stash: &str, updated: bool) -> StoreResult<()>;

    async fn set_kusama_rank(&self, stash: &str, rank: i64) -> StoreResult<()>;

    /// Reset `offline_accumulated` to zero for every candidate
    async fn clear_accumulated_offline_time(&self) -> StoreResult<()>;

    /// Replace the invalidity entry of `kind` with a fresh verdict
    async fn set_invalidity(
        &self,
        stash: &str,
        kind: InvalidityType,
        valid: bool,
        details: &str,
    ) -> StoreResult<()>;

    /// Set the overall validity verdict
    async fn set_valid(&self, stash: &str, valid: bool) -> StoreResult<()>;

    /// Record a rank increase for `start_era`; duplicate eras are
    /// ignored
    async fn add_rank_event(
        &self,
        stash: &str,
        start_era: u32,
        active_era: u32,
    ) -> StoreResult<()>;

    /// Dock rank for a fault (program policy arithmetic)
    async fn dock_points(&self, stash: &str, reason: &str) -> StoreResult<()>;

    /// Restore rank after a forgiven fault (program policy arithmetic)
    async fn forgive_docked_points(&self, stash: &str) -> StoreResult<()>;

    // ==================== Nominators ====================

    async fn upsert_nominator(&self, nominator: Nominator) -> StoreResult<()>;

    async fn get_nominator(&self, address: &str) -> StoreResult<Option<Nominator>>;

    async fn get_all_nominators(&self) -> StoreResult<Vec<Nominator>>;

    async fn set_current_targets(&self, address: &str, targets: Vec<String>) -> StoreResult<()>;

    async fn set_last_nomination(&self, address: &str, when: DateTime<Utc>) -> StoreResult<()>;

    /// Remove every nominator whose address is not in `keep`;
    /// returns the number removed
    async fn remove_stale_nominators(&self, keep: &[String]) -> StoreResult<u32>;

    // ==================== Nominations ====================

    /// Upsert a nomination keyed by (address, era); once a block hash
    /// is recorded the row is immutable
    async fn record_nomination(&self, nomination: Nomination) -> StoreResult<()>;

    async fn get_nomination(&self, address: &str, era: u32) -> StoreResult<Option<Nomination>>;

    // ==================== Era points ====================

    /// Upsert one (era, address) points row; a row holding the same
    /// value is left untouched. Returns whether a write happened.
    async fn set_era_points(&self, era: u32, address: &str, era_points: u64)
        -> StoreResult<bool>;

    async fn get_era_points(&self, era: u32, address: &str)
        -> StoreResult<Option<EraPointsRecord>>;

    /// All points rows for `address` with era in `[from_era, to_era]`
    async fn get_era_points_range(
        &self,
        address: &str,
        from_era: u32,
        to_era: u32,
    ) -> StoreResult<Vec<EraPointsRecord>>;

    /// Upsert the per-era aggregate. A filled row (total at or above
    /// the fill threshold with its median set) is immutable; a filled
    /// row missing summary fields only gains them. Returns whether a
    /// write happened.
    async fn set_total_era_points(&self, total: TotalEraPoints) -> StoreResult<bool>;

    async fn get_total_era_points(&self, era: u32) -> StoreResult<Option<TotalEraPoints>>;

    // ==================== Era stats ====================

    async fn set_era_stats(
        &self,
        era: u32,
        total_nodes: u32,
        valid: u32,
        active: u32,
    ) -> StoreResult<()>;

    async fn get_era_stats(&self, era: u32) -> StoreResult<Option<EraStats>>;

    // ==================== Scores ====================

    async fn set_validator_score(&self, score: ValidatorScore) -> StoreResult<()>;

    async fn get_validator_score(&self, address: &str) -> StoreResult<Option<ValidatorScore>>;

    async fn set_validator_score_metadata(
        &self,
        metadata: ValidatorScoreMetadata,
    ) -> StoreResult<()>;

    async fn get_validator_score_metadata(&self)
        -> StoreResult<Option<ValidatorScoreMetadata>>;

    // ==================== Delayed transactions ====================

    /// Record a delayed transaction; a duplicate (number, controller)
    /// is ignored
    async fn add_delayed_tx(&self, tx: DelayedTx) -> StoreResult<()>;

    async fn get_all_delayed_txs(&self) -> StoreResult<Vec<DelayedTx>>;

    async fn delete_delayed_tx(&self, number: u64, controller: &str) -> StoreResult<()>;

    // ==================== Meta ====================

    /// Record an upstream release; an existing record of the same
    /// name keeps its original publication time
    async fn set_release(&self, name: &str, published_at: DateTime<Utc>) -> StoreResult<()>;

    async fn get_latest_release(&self) -> StoreResult<Option<Release>>;

    /// Write the chain metadata singleton; an existing record is left
    /// untouched
    async fn set_chain_metadata(&self, name: &str, decimals: u32) -> StoreResult<()>;

    async fn get_chain_metadata(&self) -> StoreResult<Option<ChainMetadata>>;

    async fn set_last_nominated_era(&self, era: u32) -> StoreResult<()>;

    async fn get_last_nominated_era(&self) -> StoreResult<Option<u32>>;
}
