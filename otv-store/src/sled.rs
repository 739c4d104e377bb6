//! Sled Persistent Store
//!
//! Embedded persistent implementation. One tree per collection, JSON
//! values, composite string keys for the (era, address) and
//! (number, controller) collections. Era points keys are laid out as
//! `address:era` so an address range scan is a prefix scan.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tracing::debug;

use otv_core::constants::ERA_FILL_THRESHOLD;
use otv_core::types::{
    Candidate, ChainIdentity, ChainMetadata, DelayedTx, EraPointsRecord, EraStats, FaultEvent,
    InvalidityType, Nomination, Nominator, RankEvent, Release, RewardDestination, TotalEraPoints,
    ValidatorScore, ValidatorScoreMetadata,
};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

const CANDIDATES_TREE: &str = "candidates";
const STASH_INDEX_TREE: &str = "stash_index";
const NOMINATORS_TREE: &str = "nominators";
const NOMINATIONS_TREE: &str = "nominations";
const ERA_POINTS_TREE: &str = "era_points";
const TOTAL_ERA_POINTS_TREE: &str = "total_era_points";
const ERA_STATS_TREE: &str = "era_stats";
const SCORES_TREE: &str = "scores";
const DELAYED_TXS_TREE: &str = "delayed_txs";
const RELEASES_TREE: &str = "releases";
const SINGLETONS_TREE: &str = "singletons";

const CHAIN_METADATA_KEY: &str = "chain_metadata";
const SCORE_METADATA_KEY: &str = "score_metadata";
const LAST_NOMINATED_ERA_KEY: &str = "last_nominated_era";

/// Sled-backed store
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    candidates: sled::Tree,
    stash_index: sled::Tree,
    nominators: sled::Tree,
    nominations: sled::Tree,
    era_points: sled::Tree,
    total_era_points: sled::Tree,
    era_stats: sled::Tree,
    scores: sled::Tree,
    delayed_txs: sled::Tree,
    releases: sled::Tree,
    singletons: sled::Tree,
}

impl SledStore {
    /// Open or create the database at `path`. Failure here is fatal
    /// to the caller; the backend never runs without its store.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let open_tree = |name: &str| {
            db.open_tree(name)
                .map_err(|e| StoreError::Unavailable(format!("Failed to open tree {name}: {e}")))
        };

        Ok(Self {
            candidates: open_tree(CANDIDATES_TREE)?,
            stash_index: open_tree(STASH_INDEX_TREE)?,
            nominators: open_tree(NOMINATORS_TREE)?,
            nominations: open_tree(NOMINATIONS_TREE)?,
            era_points: open_tree(ERA_POINTS_TREE)?,
            total_era_points: open_tree(TOTAL_ERA_POINTS_TREE)?,
            era_stats: open_tree(ERA_STATS_TREE)?,
            scores: open_tree(SCORES_TREE)?,
            delayed_txs: open_tree(DELAYED_TXS_TREE)?,
            releases: open_tree(RELEASES_TREE)?,
            singletons: open_tree(SINGLETONS_TREE)?,
            db,
        })
    }

    /// Flush all trees to disk
    pub fn flush(&self) -> StoreResult<()> {
        self.db
            .flush()
            .map(|_| ())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    // ==================== Helpers ====================

    fn serialize<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get<T: DeserializeOwned>(tree: &sled::Tree, key: &str) -> StoreResult<Option<T>> {
        match tree.get(key).map_err(|e| StoreError::Backend(e.to_string()))? {
            Some(bytes) => Ok(Some(Self::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(tree: &sled::Tree, key: &str, value: &T) -> StoreResult<()> {
        tree.insert(key, Self::serialize(value)?)
            .map(|_| ())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn scan<T: DeserializeOwned>(tree: &sled::Tree) -> StoreResult<Vec<T>> {
        let mut values = Vec::new();
        for item in tree.iter() {
            let (_, bytes) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            values.push(Self::deserialize(&bytes)?);
        }
        Ok(values)
    }

    fn era_points_key(address: &str, era: u32) -> String {
        format!("{address}:{era:010}")
    }

    fn nomination_key(address: &str, era: u32) -> String {
        format!("{address}:{era:010}")
    }

    fn delayed_tx_key(number: u64, controller: &str) -> String {
        format!("{number:020}:{controller}")
    }

    fn era_key(era: u32) -> String {
        format!("{era:010}")
    }

    fn name_for_stash(&self, stash: &str) -> StoreResult<Option<String>> {
        match self
            .stash_index
            .get(stash)
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            Some(bytes) => Ok(Some(
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| StoreError::Serialization(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// Apply `f` to the candidate addressed by stash; a missing
    /// candidate is a logged no-op
    fn update_by_stash<F>(&self, stash: &str, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Candidate),
    {
        let Some(name) = self.name_for_stash(stash)? else {
            debug!(stash = %stash, "No candidate for stash, skipping update");
            return Ok(());
        };
        let Some(mut candidate) = Self::get::<Candidate>(&self.candidates, &name)? else {
            debug!(stash = %stash, name = %name, "Stash index points at missing candidate");
            return Ok(());
        };
        f(&mut candidate);
        Self::put(&self.candidates, &name, &candidate)
    }

    fn update_by_name<F>(&self, name: &str, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Candidate),
    {
        let Some(mut candidate) = Self::get::<Candidate>(&self.candidates, name)? else {
            debug!(name = %name, "No candidate for name, skipping update");
            return Ok(());
        };
        f(&mut candidate);
        Self::put(&self.candidates, name, &candidate)
    }

    fn update_nominator<F>(&self, address: &str, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Nominator),
    {
        let Some(mut nominator) = Self::get::<Nominator>(&self.nominators, address)? else {
            debug!(address = %address, "No nominator for address, skipping update");
            return Ok(());
        };
        f(&mut nominator);
        Self::put(&self.nominators, address, &nominator)
    }
}

#[async_trait]
impl Store for SledStore {
    // ==================== Candidates ====================

    async fn add_candidate(
        &self,
        name: &str,
        stash: &str,
        kusama_stash: Option<&str>,
    ) -> StoreResult<()> {
        let mut candidate = match Self::get::<Candidate>(&self.candidates, name)? {
            Some(existing) => existing,
            None => Candidate::new(name, stash),
        };
        if candidate.stash != stash {
            self.stash_index
                .remove(candidate.stash.as_str())
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            candidate.stash = stash.to_string();
        }
        candidate.kusama_stash = kusama_stash.map(str::to_string);

        Self::put(&self.candidates, name, &candidate)?;
        self.stash_index
            .insert(stash, name.as_bytes())
            .map(|_| ())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn get_candidate(&self, stash: &str) -> StoreResult<Option<Candidate>> {
        match self.name_for_stash(stash)? {
            Some(name) => Self::get(&self.candidates, &name),
            None => Ok(None),
        }
    }

    async fn get_candidate_by_name(&self, name: &str) -> StoreResult<Option<Candidate>> {
        Self::get(&self.candidates, name)
    }

    async fn get_all_candidates(&self) -> StoreResult<Vec<Candidate>> {
        Self::scan(&self.candidates)
    }

    async fn report_online(
        &self,
        name: &str,
        telemetry_id: u64,
        version: &str,
    ) -> StoreResult<()> {
        let now = Utc::now();
        let mut candidate = match Self::get::<Candidate>(&self.candidates, name)? {
            Some(existing) => existing,
            None => Candidate::new(name, ""),
        };

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

        Self::put(&self.candidates, name, &candidate)
    }

    async fn report_offline(&self, name: &str) -> StoreResult<()> {
        self.update_by_name(name, |candidate| {
            candidate.node_refs = candidate.node_refs.saturating_sub(1);
            if candidate.node_refs == 0 && candidate.offline_since.is_none() {
                candidate.offline_since = Some(Utc::now());
            }
        })
    }

    async fn report_best_block(&self, telemetry_id: u64) -> StoreResult<()> {
        let now = Utc::now();
        for item in self.candidates.iter() {
            let (key, bytes) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            let mut candidate: Candidate = Self::deserialize(&bytes)?;
            if candidate.telemetry_id != Some(telemetry_id) {
                continue;
            }
            if let Some(offline_since) = candidate.offline_since.take() {
                candidate.offline_accumulated += (now - offline_since).num_milliseconds();
                candidate.online_since = Some(now);
                self.candidates
                    .insert(key, Self::serialize(&candidate)?)
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
            }
            return Ok(());
        }
        debug!(telemetry_id, "No candidate for telemetry id, skipping best block");
        Ok(())
    }

    async fn set_active(&self, stash: &str, active: bool) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.active = active)
    }

    async fn set_identity(&self, stash: &str, identity: ChainIdentity) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.identity = Some(identity))
    }

    async fn set_commission(&self, stash: &str, commission: f64) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.commission = commission)
    }

    async fn set_controller(&self, stash: &str, controller: &str) -> StoreResult<()> {
        let controller = controller.to_string();
        self.update_by_stash(stash, |c| c.controller = Some(controller))
    }

    async fn set_reward_destination(
        &self,
        stash: &str,
        destination: RewardDestination,
    ) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.reward_destination = Some(destination))
    }

    async fn set_bonded(&self, stash: &str, bonded: u128) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.bonded = Some(bonded))
    }

    async fn set_queued_keys(&self, stash: &str, keys: &str) -> StoreResult<()> {
        let keys = keys.to_string();
        self.update_by_stash(stash, |c| c.queued_keys = Some(keys))
    }

    async fn set_next_keys(&self, stash: &str, keys: &str) -> StoreResult<()> {
        let keys = keys.to_string();
        self.update_by_stash(stash, |c| c.next_keys = Some(keys))
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
    }

    async fn set_unclaimed_eras(&self, stash: &str, eras: Vec<u32>) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.unclaimed_eras = eras)
    }

    async fn set_nominated_at(&self, stash: &str, when: DateTime<Utc>) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.nominated_at = Some(when))
    }

    async fn set_updated(&self, stash: &str, updated: bool) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.updated = updated)
    }

    async fn set_kusama_rank(&self, stash: &str, rank: i64) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.kusama_rank = Some(rank))
    }

    async fn clear_accumulated_offline_time(&self) -> StoreResult<()> {
        for item in self.candidates.iter() {
            let (key, bytes) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            let mut candidate: Candidate = Self::deserialize(&bytes)?;
            if candidate.offline_accumulated != 0 {
                candidate.offline_accumulated = 0;
                self.candidates
                    .insert(key, Self::serialize(&candidate)?)
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
            }
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
    }

    async fn set_valid(&self, stash: &str, valid: bool) -> StoreResult<()> {
        self.update_by_stash(stash, |c| c.valid = valid)
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
    }

    async fn forgive_docked_points(&self, stash: &str) -> StoreResult<()> {
        self.update_by_stash(stash, |c| {
            c.rank = c.rank * 2 + 1;
            c.faults -= 1;
        })
    }

    // ==================== Nominators ====================

    async fn upsert_nominator(&self, nominator: Nominator) -> StoreResult<()> {
        match Self::get::<Nominator>(&self.nominators, &nominator.address)? {
            Some(mut existing) => {
                existing.stash = nominator.stash;
                existing.proxy = nominator.proxy;
                existing.bonded = nominator.bonded;
                Self::put(&self.nominators, &existing.address.clone(), &existing)
            }
            None => Self::put(&self.nominators, &nominator.address.clone(), &nominator),
        }
    }

    async fn get_nominator(&self, address: &str) -> StoreResult<Option<Nominator>> {
        Self::get(&self.nominators, address)
    }

    async fn get_all_nominators(&self) -> StoreResult<Vec<Nominator>> {
        Self::scan(&self.nominators)
    }

    async fn set_current_targets(&self, address: &str, targets: Vec<String>) -> StoreResult<()> {
        self.update_nominator(address, |n| n.current = targets)
    }

    async fn set_last_nomination(&self, address: &str, when: DateTime<Utc>) -> StoreResult<()> {
        self.update_nominator(address, |n| n.last_nomination = Some(when))
    }

    async fn remove_stale_nominators(&self, keep: &[String]) -> StoreResult<u32> {
        let mut stale = Vec::new();
        for item in self.nominators.iter() {
            let (key, _) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            let address = String::from_utf8(key.to_vec())
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if !keep.iter().any(|k| k == &address) {
                stale.push(address);
            }
        }
        for address in &stale {
            self.nominators
                .remove(address.as_str())
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        Ok(stale.len() as u32)
    }

    // ==================== Nominations ====================

    async fn record_nomination(&self, nomination: Nomination) -> StoreResult<()> {
        let key = Self::nomination_key(&nomination.address, nomination.era);
        if let Some(existing) = Self::get::<Nomination>(&self.nominations, &key)? {
            if existing.block_hash.is_some() {
                debug!(
                    address = %nomination.address,
                    era = nomination.era,
                    "Nomination already finalized, skipping"
                );
                return Ok(());
            }
        }
        Self::put(&self.nominations, &key, &nomination)
    }

    async fn get_nomination(&self, address: &str, era: u32) -> StoreResult<Option<Nomination>> {
        Self::get(&self.nominations, &Self::nomination_key(address, era))
    }

    // ==================== Era points ====================

    async fn set_era_points(
        &self,
        era: u32,
        address: &str,
        era_points: u64,
    ) -> StoreResult<bool> {
        let key = Self::era_points_key(address, era);
        if let Some(existing) = Self::get::<EraPointsRecord>(&self.era_points, &key)? {
            if existing.era_points == era_points {
                return Ok(false);
            }
        }
        Self::put(
            &self.era_points,
            &key,
            &EraPointsRecord {
                era,
                address: address.to_string(),
                era_points,
            },
        )?;
        Ok(true)
    }

    async fn get_era_points(
        &self,
        era: u32,
        address: &str,
    ) -> StoreResult<Option<EraPointsRecord>> {
        Self::get(&self.era_points, &Self::era_points_key(address, era))
    }

    async fn get_era_points_range(
        &self,
        address: &str,
        from_era: u32,
        to_era: u32,
    ) -> StoreResult<Vec<EraPointsRecord>> {
        let mut records = Vec::new();
        for item in self.era_points.scan_prefix(format!("{address}:")) {
            let (_, bytes) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            let record: EraPointsRecord = Self::deserialize(&bytes)?;
            if record.era >= from_era && record.era <= to_era {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn set_total_era_points(&self, total: TotalEraPoints) -> StoreResult<bool> {
        let key = Self::era_key(total.era);
        if let Some(mut existing) = Self::get::<TotalEraPoints>(&self.total_era_points, &key)? {
            if existing.total_era_points >= ERA_FILL_THRESHOLD {
                if existing.median.is_some() {
                    return Ok(false);
                }
                // A filled row only gains its summary fields.
                existing.median = total.median;
                existing.average = total.average;
                existing.max = total.max;
                existing.min = total.min;
                Self::put(&self.total_era_points, &key, &existing)?;
                return Ok(true);
            }
        }
        Self::put(&self.total_era_points, &key, &total)?;
        Ok(true)
    }

    async fn get_total_era_points(&self, era: u32) -> StoreResult<Option<TotalEraPoints>> {
        Self::get(&self.total_era_points, &Self::era_key(era))
    }

    // ==================== Era stats ====================

    async fn set_era_stats(
        &self,
        era: u32,
        total_nodes: u32,
        valid: u32,
        active: u32,
    ) -> StoreResult<()> {
        let key = Self::era_key(era);
        if let Some(existing) = Self::get::<EraStats>(&self.era_stats, &key)? {
            if existing.total_nodes == total_nodes
                && existing.valid == valid
                && existing.active == active
            {
                return Ok(());
            }
        }
        Self::put(
            &self.era_stats,
            &key,
            &EraStats {
                era,
                when: Utc::now(),
                total_nodes,
                valid,
                active,
            },
        )
    }

    async fn get_era_stats(&self, era: u32) -> StoreResult<Option<EraStats>> {
        Self::get(&self.era_stats, &Self::era_key(era))
    }

    // ==================== Scores ====================

    async fn set_validator_score(&self, score: ValidatorScore) -> StoreResult<()> {
        Self::put(&self.scores, &score.address.clone(), &score)
    }

    async fn get_validator_score(&self, address: &str) -> StoreResult<Option<ValidatorScore>> {
        Self::get(&self.scores, address)
    }

    async fn set_validator_score_metadata(
        &self,
        metadata: ValidatorScoreMetadata,
    ) -> StoreResult<()> {
        Self::put(&self.singletons, SCORE_METADATA_KEY, &metadata)
    }

    async fn get_validator_score_metadata(
        &self,
    ) -> StoreResult<Option<ValidatorScoreMetadata>> {
        Self::get(&self.singletons, SCORE_METADATA_KEY)
    }

    // ==================== Delayed transactions ====================

    async fn add_delayed_tx(&self, tx: DelayedTx) -> StoreResult<()> {
        let key = Self::delayed_tx_key(tx.number, &tx.controller);
        if Self::get::<DelayedTx>(&self.delayed_txs, &key)?.is_some() {
            return Ok(());
        }
        Self::put(&self.delayed_txs, &key, &tx)
    }

    async fn get_all_delayed_txs(&self) -> StoreResult<Vec<DelayedTx>> {
        Self::scan(&self.delayed_txs)
    }

    async fn delete_delayed_tx(&self, number: u64, controller: &str) -> StoreResult<()> {
        self.delayed_txs
            .remove(Self::delayed_tx_key(number, controller))
            .map(|_| ())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    // ==================== Meta ====================

    async fn set_release(&self, name: &str, published_at: DateTime<Utc>) -> StoreResult<()> {
        if Self::get::<Release>(&self.releases, name)?.is_some() {
            return Ok(());
        }
        Self::put(
            &self.releases,
            name,
            &Release {
                name: name.to_string(),
                published_at,
            },
        )
    }

    async fn get_latest_release(&self) -> StoreResult<Option<Release>> {
        let releases: Vec<Release> = Self::scan(&self.releases)?;
        Ok(releases.into_iter().max_by_key(|r| r.published_at))
    }

    async fn set_chain_metadata(&self, name: &str, decimals: u32) -> StoreResult<()> {
        // An existing singleton is left untouched.
        if Self::get::<ChainMetadata>(&self.singletons, CHAIN_METADATA_KEY)?.is_some() {
            return Ok(());
        }
        Self::put(
            &self.singletons,
            CHAIN_METADATA_KEY,
            &ChainMetadata {
                name: name.to_string(),
                decimals,
            },
        )
    }

    async fn get_chain_metadata(&self) -> StoreResult<Option<ChainMetadata>> {
        Self::get(&self.singletons, CHAIN_METADATA_KEY)
    }

    async fn set_last_nominated_era(&self, era: u32) -> StoreResult<()> {
        Self::put(&self.singletons, LAST_NOMINATED_ERA_KEY, &era)
    }

    async fn get_last_nominated_era(&self) -> StoreResult<Option<u32>> {
        Self::get(&self.singletons, LAST_NOMINATED_ERA_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp_store() -> (SledStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_candidate_roundtrip() {
        let (store, _dir) = open_temp_store();
        store.add_candidate("Alice", "STASH_A", None).await.unwrap();
        store.set_commission("STASH_A", 5.0).await.unwrap();

        let candidate = store.get_candidate("STASH_A").await.unwrap().unwrap();
        assert_eq!(candidate.name, "Alice");
        assert_eq!(candidate.commission, 5.0);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SledStore::open(dir.path()).unwrap();
            store.add_candidate("Alice", "STASH_A", None).await.unwrap();
            store.set_valid("STASH_A", true).await.unwrap();
            store.flush().unwrap();
        }
        let store = SledStore::open(dir.path()).unwrap();
        let candidate = store.get_candidate("STASH_A").await.unwrap().unwrap();
        assert!(candidate.valid);
    }

    #[tokio::test]
    async fn test_era_points_prefix_scan() {
        let (store, _dir) = open_temp_store();
        for era in 0..5 {
            store.set_era_points(era, "STASH_A", 100).await.unwrap();
            store.set_era_points(era, "STASH_B", 200).await.unwrap();
        }

        let records = store.get_era_points_range("STASH_A", 1, 3).await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.address == "STASH_A"));
    }

    #[tokio::test]
    async fn test_era_points_idempotent() {
        let (store, _dir) = open_temp_store();
        assert!(store.set_era_points(7, "STASH_A", 500).await.unwrap());
        assert!(!store.set_era_points(7, "STASH_A", 500).await.unwrap());
    }

    #[tokio::test]
    async fn test_delayed_tx_roundtrip() {
        let (store, _dir) = open_temp_store();
        let tx = DelayedTx {
            number: 42,
            controller: "C".into(),
            targets: vec!["T".into()],
            call_hash: "H".into(),
        };
        store.add_delayed_tx(tx.clone()).await.unwrap();
        store.add_delayed_tx(tx).await.unwrap();
        assert_eq!(store.get_all_delayed_txs().await.unwrap().len(), 1);

        store.delete_delayed_tx(42, "C").await.unwrap();
        assert!(store.get_all_delayed_txs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_singletons() {
        let (store, _dir) = open_temp_store();
        assert!(store.get_last_nominated_era().await.unwrap().is_none());
        store.set_last_nominated_era(1234).await.unwrap();
        assert_eq!(store.get_last_nominated_era().await.unwrap(), Some(1234));

        store.set_chain_metadata("Kusama", 12).await.unwrap();
        store.set_chain_metadata("Other", 10).await.unwrap();
        assert_eq!(store.get_chain_metadata().await.unwrap().unwrap().name, "Kusama");
    }
}
