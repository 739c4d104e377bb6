//! In-Memory Store
//!
//! Thread-safe in-memory implementation, used by tests and
//! development runs. Collections are `RwLock`-guarded maps keyed the
//! same way the persistent backend keys its trees.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use otv_core::constants::ERA_FILL_THRESHOLD;
use otv_core::types::{
    Candidate, ChainIdentity, ChainMetadata, DelayedTx, EraPointsRecord, EraStats, FaultEvent,
    InvalidityType, Nomination, Nominator, RankEvent, Release, RewardDestination, TotalEraPoints,
    ValidatorScore, ValidatorScoreMetadata,
};

use crate::error::StoreResult;
use crate::store::Store;

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    candidates: Arc<RwLock<HashMap<String, Candidate>>>,
    stash_index: Arc<RwLock<HashMap<String, String>>>,
    nominators: Arc<RwLock<HashMap<String, Nominator>>>,
    nominations: Arc<RwLock<HashMap<(String, u32), Nomination>>>,
    era_points: Arc<RwLock<HashMap<(u32, String), EraPointsRecord>>>,
    total_era_points: Arc<RwLock<HashMap<u32, TotalEraPoints>>>,
    era_stats: Arc<RwLock<HashMap<u32, EraStats>>>,
    scores: Arc<RwLock<HashMap<String, ValidatorScore>>>,
    score_metadata: Arc<RwLock<Option<ValidatorScoreMetadata>>>,
    delayed_txs: Arc<RwLock<HashMap<(u64, String), DelayedTx>>>,
    releases: Arc<RwLock<HashMap<String, Release>>>,
    chain_metadata: Arc<RwLock<Option<ChainMetadata>>>,
    last_nominated_era: Arc<RwLock<Option<u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `f` to the candidate addressed by stash; a missing
    /// candidate is a logged no-op
    async fn update_by_stash<F>(&self, stash: &str, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Candidate),
    {
        let name = match self.stash_index.read().await.get(stash) {
            Some(name) => name.clone(),
            None => {
                debug!(stash = %stash, "No candidate for stash, skipping update");
                return Ok(());
            }
        };

        let mut candidates = self.candidates.write().await;
        match candidates.get_mut(&name) {
            Some(candidate) => f(candidate),
            None => warn!(stash = %stash, name = %name, "Stash index points at missing candidate"),
        }
        Ok(())
    }

    /// Apply `f` to the candidate addressed by name; a missing
    /// candidate is a logged no-op
    async fn update_by_name<F>(&self, name: &str, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Candidate),
    {
        let mut candidates = self.candidates.write().await;
        match candidates.get_mut(name) {
            Some(candidate) => f(candidate),
            None => debug!(name = %name, "No candidate for name, skipping update"),
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    // ==================== Candidates ====================

    async fn add_candidate(
        &self,
        name: &str,
        stash: &str,
        kusama_stash: Option<&str>,
    ) -> StoreResult<()> {
        let mut candidates = self.candidates.write().await;
        let mut index = self.stash_index.write().await;

        match candidates.get_mut(name) {
            Some(candidate) => {
                if candidate.stash != stash {
                    index.remove(&candidate.stash);
                    candidate.stash = stash.to_string();
                }
                candidate.kusama_stash = kusama_stash.map(str::to_string);
            }
            None => {
                let mut candidate = Candidate::new(name, stash);
                candidate.kusama_stash = kusama_stash.map(str::to_string);
                candidates.insert(name.to_string(), candidate);
            }
        }
        index.insert(stash.to_string(), name.to_string());
        Ok(())
    }

    async fn get_candidate(&self, stash: &str) -> StoreResult<Option<Candidate>> {
        let index = self.stash_index.read().await;
        let Some(name) = index.get(stash) else {
            return Ok(None);
        };
        Ok(self.candidates.read().await.get(name).cloned())
    }

    async fn get_candidate_by_name(&self, name: &str) -> StoreResult<Option<Candidate>> {
        Ok(self.candidates.read().await.get(name).cloned())
    }

    async fn get_all_candidates(&self) -> StoreResult<Vec<Candidate>> {
        Ok(self.candidates.read().await.values().cloned().collect())
    }

    async fn report_online(
        &self,
        name: &str,
        telemetry_id: u64,
        version: &str,
    ) -> StoreResult<()> {
        let now = Utc::now();
        let mut candidates = self.candidates.write().await;

        let candidate = candidates
            .entry(name.to_string())
            .or_insert_with(|| Candidate::new(name, ""));

        if candidate.discovered_at.is_none() {
            candidate.discovered_at = Some(now);
        }
        if let Some(offline_since) = candidate.offline_since.take() {
            candidate.offline_accumulated += (now - offline_since).num_milliseconds();
        }
        if candidate.online_since.is_none() {
            candidate.online_since = Some(now);
        }
        candidate.node_refs += 1;
        candidate.telemetry_id = Some(telemetry_id);
        candidate.version = Some(version.to_string());
        Ok(())
    }

    async fn report_offline(&self, name: &str) -> StoreResult<()> {
        self.update_by_name(name, |candidate| {
            candidate.node_refs = candidate.node_refs.saturating_sub(1);
            if candidate.node_refs == 0 && candidate.offline_since.is_none() {
                candidate.offline_since = Some(Utc::now());
            }
        })
        .await
    }

    async fn report_best_block(&self, telemetry_id: u64) -> StoreResult<()> {
        let now = Utc::now();
        let mut candidates = self.candidates.write().await;

        let found = candidates
            .values_mut()
            .find(|c| c.telemetry_id == Some(telemetry_id));

        match found {
            Some(candidate) => {
                // A best-block report proves the node is alive.
                if let Some(offline_since) = candidate.offline_since.take() {
                    candidate.offline_accumulated += (now - offline_since).num_milliseconds();
                    candidate.online_since = Some(now);
                }
            }
            None => debug!(telemetry_id, "No candidate for telemetry id, skipping best block"),
        }
        Ok(())
    }

    async fn set_active(&self, stash: &str, active: bool) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.active = active).await
    }

    async fn set_identity(&self, stash: &str, identity: ChainIdentity) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.identity = Some(identity))
            .await
    }

    async fn set_commission(&self, stash: &str, commission: f64) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.commission = commission)
            .await
    }

    async fn set_controller(&self, stash: &str, controller: &str) -> StoreResult<()> {
        let controller = controller.to_string();
        self.update_by_stash(stash, |c| c.controller = Some(controller))
            .await
    }

    async fn set_reward_destination(
        &self,
        stash: &str,
        destination: RewardDestination,
    ) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.reward_destination = Some(destination))
            .await
    }

    async fn set_bonded(&self, stash: &str, bonded: u128) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.bonded = Some(bonded)).await
    }

    async fn set_queued_keys(&self, stash: &str, keys: &str) -> StoreResult<()> {
        let keys = keys.to_string();
        self.update_by_stash(stash, |c| c.queued_keys = Some(keys))
            .await
    }

    async fn set_next_keys(&self, stash: &str, keys: &str) -> StoreResult<()> {
        let keys = keys.to_string();
        self.update_by_stash(stash, |c| c.next_keys = Some(keys))
            .await
    }

    async fn set_inclusion(
        &self,
        stash: &str,
        inclusion: f64,
        span_inclusion: f64,
    ) -> StoreResult<()> {
        self.update_by_stash(stash, |c| {
            c.inclusion = inclusion;
            c.span_inclusion = span_inclusion;
        })
        .await
    }

    async fn set_unclaimed_eras(&self, stash: &str, eras: Vec<u32>) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.unclaimed_eras = eras).await
    }

    async fn set_nominated_at(&self, stash: &str, when: DateTime<Utc>) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.nominated_at = Some(when))
            .await
    }

    async fn set_updated(&self, stash: &str, updated: bool) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.updated = updated).await
    }

    async fn set_kusama_rank(&self, stash: &str, rank: i64) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.kusama_rank = Some(rank))
            .await
    }

    async fn clear_accumulated_offline_time(&self) -> StoreResult<()> {
        let mut candidates = self.candidates.write().await;
        for candidate in candidates.values_mut() {
            candidate.offline_accumulated = 0;
        }
        Ok(())
    }

    async fn set_invalidity(
        &self,
        stash: &str,
        kind: InvalidityType,
        valid: bool,
        details: &str,
    ) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.invalidity.set(kind, valid, details))
            .await
    }

    async fn set_valid(&self, stash: &str, valid: bool) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.valid = valid).await
    }

    async fn add_rank_event(
        &self,
        stash: &str,
        start_era: u32,
        active_era: u32,
    ) -> StoreResult<()> {
        self.update_by_stash(stash, |c| {
            if c.rank_events.iter().any(|e| e.start_era == start_era) {
                return;
            }
            c.rank += 1;
            c.rank_events.push(RankEvent {
                when: Utc::now(),
                start_era,
                active_era,
            });
        })
        .await
    }

    async fn dock_points(&self, stash: &str, reason: &str) -> StoreResult<()> {
        let reason = reason.to_string();
        self.update_by_stash(stash, |c| {
            let prev_rank = c.rank;
            c.faults += 1;
            c.rank -= c.rank / 6;
            c.fault_events.push(FaultEvent {
                when: Utc::now(),
                reason,
                prev_rank,
            });
        })
        .await
    }

    async fn forgive_docked_points(&self, stash: &str) -> StoreResult<()> {
        self.update_by_stash(stash, |c| {
            c.rank = c.rank * 2 + 1;
            c.faults -= 1;
        })
        .await
    }

    // ==================== Nominators ====================

    async fn upsert_nominator(&self, nominator: Nominator) -> StoreResult<()> {
        let mut nominators = self.nominators.write().await;
        match nominators.get_mut(&nominator.address) {
            Some(existing) => {
                existing.stash = nominator.stash;
                existing.proxy = nominator.proxy;
                existing.bonded = nominator.bonded;
            }
            None => {
                nominators.insert(nominator.address.clone(), nominator);
            }
        }
        Ok(())
    }

    async fn get_nominator(&self, address: &str) -> StoreResult<Option<Nominator>> {
        Ok(self.nominators.read().await.get(address).cloned())
    }

    async fn get_all_nominators(&self) -> StoreResult<Vec<Nominator>> {
        Ok(self.nominators.read().await.values().cloned().collect())
    }

    async fn set_current_targets(&self, address: &str, targets: Vec<String>) -> StoreResult<()> {
        let mut nominators = self.nominators.write().await;
        match nominators.get_mut(address) {
            Some(nominator) => nominator.current = targets,
            None => debug!(address = %address, "No nominator for address, skipping targets"),
        }
        Ok(())
    }

    async fn set_last_nomination(&self, address: &str, when: DateTime<Utc>) -> StoreResult<()> {
        let mut nominators = self.nominators.write().await;
        match nominators.get_mut(address) {
            Some(nominator) => nominator.last_nomination = Some(when),
            None => debug!(address = %address, "No nominator for address, skipping timestamp"),
        }
        Ok(())
    }

    async fn remove_stale_nominators(&self, keep: &[String]) -> StoreResult<u32> {
        let mut nominators = self.nominators.write().await;
        let before = nominators.len();
        nominators.retain(|address, _| keep.iter().any(|k| k == address));
        Ok((before - nominators.len()) as u32)
    }

    // ==================== Nominations ====================

    async fn record_nomination(&self, nomination: Nomination) -> StoreResult<()> {
        let key = (nomination.address.clone(), nomination.era);
        let mut nominations = self.nominations.write().await;
        if let Some(existing) = nominations.get(&key) {
            if existing.block_hash.is_some() {
                debug!(
                    address = %nomination.address,
                    era = nomination.era,
                    "Nomination already finalized, skipping"
                );
                return Ok(());
            }
        }
        nominations.insert(key, nomination);
        Ok(())
    }

    async fn get_nomination(&self, address: &str, era: u32) -> StoreResult<Option<Nomination>> {
        Ok(self
            .nominations
            .read()
            .await
            .get(&(address.to_string(), era))
            .cloned())
    }

    // ==================== Era points ====================

    async fn set_era_points(
        &self,
        era: u32,
        address: &str,
        era_points: u64,
    ) -> StoreResult<bool> {
        let key = (era, address.to_string());
        let mut points = self.era_points.write().await;
        if let Some(existing) = points.get(&key) {
            if existing.era_points == era_points {
                return Ok(false);
            }
        }
        points.insert(
            key,
            EraPointsRecord {
                era,
                address: address.to_string(),
                era_points,
            },
        );
        Ok(true)
    }

    async fn get_era_points(
        &self,
        era: u32,
        address: &str,
    ) -> StoreResult<Option<EraPointsRecord>> {
        Ok(self
            .era_points
            .read()
            .await
            .get(&(era, address.to_string()))
            .cloned())
    }

    async fn get_era_points_range(
        &self,
        address: &str,
        from_era: u32,
        to_era: u32,
    ) -> StoreResult<Vec<EraPointsRecord>> {
        Ok(self
            .era_points
            .read()
            .await
            .values()
            .filter(|r| r.address == address && r.era >= from_era && r.era <= to_era)
            .cloned()
            .collect())
    }

    async fn set_total_era_points(&self, total: TotalEraPoints) -> StoreResult<bool> {
        let mut totals = self.total_era_points.write().await;
        if let Some(existing) = totals.get_mut(&total.era) {
            if existing.total_era_points >= ERA_FILL_THRESHOLD {
                if existing.median.is_some() {
                    return Ok(false);
                }
                // A filled row only gains its summary fields.
                existing.median = total.median;
                existing.average = total.average;
                existing.max = total.max;
                existing.min = total.min;
                return Ok(true);
            }
        }
        totals.insert(total.era, total);
        Ok(true)
    }

    async fn get_total_era_points(&self, era: u32) -> StoreResult<Option<TotalEraPoints>> {
        Ok(self.total_era_points.read().await.get(&era).cloned())
    }

    // ==================== Era stats ====================

    async fn set_era_stats(
        &self,
        era: u32,
        total_nodes: u32,
        valid: u32,
        active: u32,
    ) -> StoreResult<()> {
        let mut stats = self.era_stats.write().await;
        if let Some(existing) = stats.get(&era) {
            if existing.total_nodes == total_nodes
                && existing.valid == valid
                && existing.active == active
            {
                return Ok(());
            }
        }
        stats.insert(
            era,
            EraStats {
                era,
                when: Utc::now(),
                total_nodes,
                valid,
                active,
            },
        );
        Ok(())
    }

    async fn get_era_stats(&self, era: u32) -> StoreResult<Option<EraStats>> {
        Ok(self.era_stats.read().await.get(&era).cloned())
    }

    // ==================== Scores ====================

    async fn set_validator_score(&self, score: ValidatorScore) -> StoreResult<()> {
        self.scores
            .write()
            .await
            .insert(score.address.clone(), score);
        Ok(())
    }

    async fn get_validator_score(&self, address: &str) -> StoreResult<Option<ValidatorScore>> {
        Ok(self.scores.read().await.get(address).cloned())
    }

    async fn set_validator_score_metadata(
        &self,
        metadata: ValidatorScoreMetadata,
    ) -> StoreResult<()> {
        *self.score_metadata.write().await = Some(metadata);
        Ok(())
    }

    async fn get_validator_score_metadata(
        &self,
    ) -> StoreResult<Option<ValidatorScoreMetadata>> {
        Ok(self.score_metadata.read().await.clone())
    }

    // ==================== Delayed transactions ====================

    async fn add_delayed_tx(&self, tx: DelayedTx) -> StoreResult<()> {
        let key = (tx.number, tx.controller.clone());
        let mut txs = self.delayed_txs.write().await;
        if txs.contains_key(&key) {
            return Ok(());
        }
        txs.insert(key, tx);
        Ok(())
    }

    async fn get_all_delayed_txs(&self) -> StoreResult<Vec<DelayedTx>> {
        Ok(self.delayed_txs.read().await.values().cloned().collect())
    }

    async fn delete_delayed_tx(&self, number: u64, controller: &str) -> StoreResult<()> {
        self.delayed_txs
            .write()
            .await
            .remove(&(number, controller.to_string()));
        Ok(())
    }

    // ==================== Meta ====================

    async fn set_release(&self, name: &str, published_at: DateTime<Utc>) -> StoreResult<()> {
        let mut releases = self.releases.write().await;
        if releases.contains_key(name) {
            return Ok(());
        }
        releases.insert(
            name.to_string(),
            Release {
                name: name.to_string(),
                published_at,
            },
        );
        Ok(())
    }

    async fn get_latest_release(&self) -> StoreResult<Option<Release>> {
        Ok(self
            .releases
            .read()
            .await
            .values()
            .max_by_key(|r| r.published_at)
            .cloned())
    }

    async fn set_chain_metadata(&self, name: &str, decimals: u32) -> StoreResult<()> {
        let mut metadata = self.chain_metadata.write().await;
        // An existing singleton is left untouched.
        if metadata.is_none() {
            *metadata = Some(ChainMetadata {
                name: name.to_string(),
                decimals,
            });
        }
        Ok(())
    }

    async fn get_chain_metadata(&self) -> StoreResult<Option<ChainMetadata>> {
        Ok(self.chain_metadata.read().await.clone())
    }

    async fn set_last_nominated_era(&self, era: u32) -> StoreResult<()> {
        *self.last_nominated_era.write().await = Some(era);
        Ok(())
    }

    async fn get_last_nominated_era(&self) -> StoreResult<Option<u32>> {
        Ok(*self.last_nominated_era.read().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn store_with_candidate() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_candidate("Alice", "STASH_A", None).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_add_candidate_upserts_by_name() {
        let store = MemoryStore::new();
        store.add_candidate("Alice", "STASH_A", None).await.unwrap();
        store
            .add_candidate("Alice", "STASH_B", Some("KSM_A"))
            .await
            .unwrap();

        let all = store.get_all_candidates().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].stash, "STASH_B");
        assert_eq!(all[0].kusama_stash.as_deref(), Some("KSM_A"));

        // The old stash no longer resolves.
        assert!(store.get_candidate("STASH_A").await.unwrap().is_none());
        assert!(store.get_candidate("STASH_B").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_candidate_write_is_noop() {
        let store = MemoryStore::new();
        store.set_active("UNKNOWN", true).await.unwrap();
        assert!(store.get_all_candidates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalidity_setter_replaces_by_type() {
        let store = store_with_candidate().await;
        store
            .set_invalidity("STASH_A", InvalidityType::Online, true, "")
            .await
            .unwrap();
        store
            .set_invalidity("STASH_A", InvalidityType::Identity, false, "no identity")
            .await
            .unwrap();
        store
            .set_invalidity("STASH_A", InvalidityType::Identity, true, "")
            .await
            .unwrap();

        let candidate = store.get_candidate("STASH_A").await.unwrap().unwrap();
        assert_eq!(candidate.invalidity.len(), 2);
        assert!(candidate.invalidity.get(InvalidityType::Identity).unwrap().valid);
        assert!(candidate.invalidity.get(InvalidityType::Online).unwrap().valid);
    }

    #[tokio::test]
    async fn test_report_online_creates_and_accumulates() {
        let store = MemoryStore::new();
        store.report_online("NewNode", 7, "1.0.0").await.unwrap();

        let candidate = store.get_candidate_by_name("NewNode").await.unwrap().unwrap();
        assert!(candidate.discovered_at.is_some());
        assert_eq!(candidate.node_refs, 1);
        assert_eq!(candidate.telemetry_id, Some(7));

        store.report_offline("NewNode").await.unwrap();
        let candidate = store.get_candidate_by_name("NewNode").await.unwrap().unwrap();
        assert!(candidate.offline_since.is_some());

        store.report_online("NewNode", 7, "1.0.0").await.unwrap();
        let candidate = store.get_candidate_by_name("NewNode").await.unwrap().unwrap();
        assert!(candidate.offline_since.is_none());
        assert!(candidate.offline_accumulated >= 0);
    }

    #[tokio::test]
    async fn test_clear_accumulated_offline_time() {
        let store = store_with_candidate().await;
        store.report_online("Alice", 1, "1.0").await.unwrap();
        store.report_offline("Alice").await.unwrap();
        // Force a visible accumulation window.
        {
            let mut candidates = store.candidates.write().await;
            let alice = candidates.get_mut("Alice").unwrap();
            alice.offline_since = Some(Utc::now() - Duration::minutes(5));
        }
        store.report_online("Alice", 1, "1.0").await.unwrap();
        let candidate = store.get_candidate_by_name("Alice").await.unwrap().unwrap();
        assert!(candidate.offline_accumulated > 0);

        store.clear_accumulated_offline_time().await.unwrap();
        let candidate = store.get_candidate_by_name("Alice").await.unwrap().unwrap();
        assert_eq!(candidate.offline_accumulated, 0);
    }

    #[tokio::test]
    async fn test_remove_stale_nominators_keeps_listed() {
        let store = MemoryStore::new();
        for address in ["A", "B", "C"] {
            store
                .upsert_nominator(Nominator::new(address, format!("{address}_STASH")))
                .await
                .unwrap();
        }

        let removed = store
            .remove_stale_nominators(&["A".to_string(), "C".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let mut left: Vec<String> = store
            .get_all_nominators()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.address)
            .collect();
        left.sort();
        assert_eq!(left, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_era_points_idempotent() {
        let store = MemoryStore::new();
        assert!(store.set_era_points(10, "STASH_A", 3600).await.unwrap());
        assert!(!store.set_era_points(10, "STASH_A", 3600).await.unwrap());
        assert!(store.set_era_points(10, "STASH_A", 3700).await.unwrap());
    }

    #[tokio::test]
    async fn test_total_era_points_fill_semantics() {
        let store = MemoryStore::new();
        let mut total = TotalEraPoints {
            era: 5,
            total_era_points: 80_000,
            validators_era_points: Vec::new(),
            median: None,
            average: None,
            max: None,
            min: None,
        };
        assert!(store.set_total_era_points(total.clone()).await.unwrap());

        // Filled row gains its summary fields exactly once.
        total.median = Some(100);
        total.average = Some(100.0);
        total.max = Some(200);
        total.min = Some(50);
        assert!(store.set_total_era_points(total.clone()).await.unwrap());

        total.total_era_points = 1;
        assert!(!store.set_total_era_points(total).await.unwrap());
        let stored = store.get_total_era_points(5).await.unwrap().unwrap();
        assert_eq!(stored.total_era_points, 80_000);
        assert_eq!(stored.median, Some(100));
    }

    #[tokio::test]
    async fn test_nomination_immutable_once_finalized() {
        let store = MemoryStore::new();
        let mut nomination = Nomination {
            address: "NOM".into(),
            era: 3,
            validators: vec!["V1".into()],
            bonded: 100,
            block_hash: Some("0xabc".into()),
            timestamp: Utc::now(),
        };
        store.record_nomination(nomination.clone()).await.unwrap();

        nomination.validators = vec!["V2".into()];
        nomination.block_hash = Some("0xdef".into());
        store.record_nomination(nomination).await.unwrap();

        let stored = store.get_nomination("NOM", 3).await.unwrap().unwrap();
        assert_eq!(stored.validators, vec!["V1".to_string()]);
        assert_eq!(stored.block_hash.as_deref(), Some("0xabc"));
    }

    #[tokio::test]
    async fn test_delayed_tx_unique_on_number_controller() {
        let store = MemoryStore::new();
        let tx = DelayedTx {
            number: 100,
            controller: "C".into(),
            targets: vec!["T".into()],
            call_hash: "H".into(),
        };
        store.add_delayed_tx(tx.clone()).await.unwrap();
        store.add_delayed_tx(tx).await.unwrap();
        assert_eq!(store.get_all_delayed_txs().await.unwrap().len(), 1);

        store.delete_delayed_tx(100, "C").await.unwrap();
        assert!(store.get_all_delayed_txs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chain_metadata_never_overwritten() {
        let store = MemoryStore::new();
        store.set_chain_metadata("Kusama", 12).await.unwrap();
        store.set_chain_metadata("Polkadot", 10).await.unwrap();

        let metadata = store.get_chain_metadata().await.unwrap().unwrap();
        assert_eq!(metadata.name, "Kusama");
        assert_eq!(metadata.decimals, 12);
    }

    #[tokio::test]
    async fn test_dock_and_forgive_points() {
        let store = store_with_candidate().await;
        {
            let mut candidates = store.candidates.write().await;
            candidates.get_mut("Alice").unwrap().rank = 12;
        }

        store.dock_points("STASH_A", "offline too long").await.unwrap();
        let candidate = store.get_candidate("STASH_A").await.unwrap().unwrap();
        assert_eq!(candidate.rank, 10); // 12 - 12/6
        assert_eq!(candidate.faults, 1);
        assert_eq!(candidate.fault_events.len(), 1);
        assert_eq!(candidate.fault_events[0].prev_rank, 12);

        store.forgive_docked_points("STASH_A").await.unwrap();
        let candidate = store.get_candidate("STASH_A").await.unwrap().unwrap();
        assert_eq!(candidate.rank, 21); // 10 * 2 + 1
        assert_eq!(candidate.faults, 0);
    }

    #[tokio::test]
    async fn test_rank_event_dedupes_by_start_era() {
        let store = store_with_candidate().await;
        store.add_rank_event("STASH_A", 100, 105).await.unwrap();
        store.add_rank_event("STASH_A", 100, 106).await.unwrap();

        let candidate = store.get_candidate("STASH_A").await.unwrap().unwrap();
        assert_eq!(candidate.rank, 1);
        assert_eq!(candidate.rank_events.len(), 1);
    }

    #[tokio::test]
    async fn test_release_keeps_first_record() {
        let store = MemoryStore::new();
        let first = Utc::now();
        store.set_release("v1.0.0", first).await.unwrap();
        store
            .set_release("v1.0.0", first + Duration::hours(1))
            .await
            .unwrap();

        let release = store.get_latest_release().await.unwrap().unwrap();
        assert_eq!(release.published_at, first);
    }
}
