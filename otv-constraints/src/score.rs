//! Fleet Scoring
//!
//! Computes the weighted score of every valid candidate. Each
//! component is rescaled against the population statistics of the
//! valid set (direction-aware: for most components a lower raw value
//! is better), multiplied by its configured weight and summed; a
//! small random factor breaks ties between otherwise equal
//! candidates. The per-candidate scores and the statistics snapshot
//! they were derived from are persisted together.

use chrono::Utc;
use tracing::{debug, info};

use otv_core::types::{Candidate, ComponentStats, ValidatorScore, ValidatorScoreMetadata};

use crate::error::ConstraintsResult;
use crate::evaluator::ConstraintsEvaluator;
use crate::stats::{component_stats, scaled, scaled_lower_is_better};

/// Raw component values of one candidate
struct Components {
    bonded: f64,
    faults: f64,
    inclusion: f64,
    span_inclusion: f64,
    discovered: f64,
    nominated: f64,
    offline: f64,
    rank: f64,
    unclaimed: f64,
    ext_nominations: f64,
}

impl Components {
    fn from_candidate(candidate: &Candidate, now_ms: f64) -> Self {
        Self {
            bonded: candidate.bonded.unwrap_or(0) as f64,
            faults: candidate.faults as f64,
            inclusion: candidate.inclusion,
            span_inclusion: candidate.span_inclusion,
            // Never-seen candidates count as discovered right now.
            discovered: candidate
                .discovered_at
                .map(|t| t.timestamp_millis() as f64)
                .unwrap_or(now_ms),
            // Never-nominated candidates count as the oldest possible.
            nominated: candidate
                .nominated_at
                .map(|t| t.timestamp_millis() as f64)
                .unwrap_or(0.0),
            offline: candidate.offline_accumulated as f64,
            rank: candidate.rank as f64,
            unclaimed: candidate.unclaimed_eras.len() as f64,
            // Per-candidate external nomination totals are not yet
            // persisted by the scan job.
            ext_nominations: 0.0,
        }
    }
}

/// Population statistics of every component
struct FleetStats {
    bonded: ComponentStats,
    faults: ComponentStats,
    inclusion: ComponentStats,
    span_inclusion: ComponentStats,
    discovered: ComponentStats,
    nominated: ComponentStats,
    offline: ComponentStats,
    rank: ComponentStats,
    unclaimed: ComponentStats,
    ext_nominations: ComponentStats,
}

impl FleetStats {
    fn compute(all: &[Components]) -> Option<Self> {
        let collect = |f: fn(&Components) -> f64| all.iter().map(f).collect::<Vec<f64>>();
        Some(Self {
            bonded: component_stats(&collect(|c| c.bonded))?,
            faults: component_stats(&collect(|c| c.faults))?,
            inclusion: component_stats(&collect(|c| c.inclusion))?,
            span_inclusion: component_stats(&collect(|c| c.span_inclusion))?,
            discovered: component_stats(&collect(|c| c.discovered))?,
            nominated: component_stats(&collect(|c| c.nominated))?,
            offline: component_stats(&collect(|c| c.offline))?,
            rank: component_stats(&collect(|c| c.rank))?,
            unclaimed: component_stats(&collect(|c| c.unclaimed))?,
            ext_nominations: component_stats(&collect(|c| c.ext_nominations))?,
        })
    }
}

impl ConstraintsEvaluator {
    /// Score every valid candidate and persist the results plus the
    /// statistics snapshot. Returns the number of candidates scored.
    pub async fn score_all_candidates(&self) -> ConstraintsResult<usize> {
        let candidates = self.db.get_all_candidates().await?;
        let valid: Vec<&Candidate> = candidates.iter().filter(|c| c.valid).collect();
        if valid.is_empty() {
            info!("No valid candidates to score");
            return Ok(0);
        }

        let now = Utc::now();
        let now_ms = now.timestamp_millis() as f64;
        let components: Vec<Components> = valid
            .iter()
            .map(|c| Components::from_candidate(c, now_ms))
            .collect();
        let Some(stats) = FleetStats::compute(&components) else {
            return Ok(0);
        };

        let weights = &self.config.score;
        for (candidate, values) in valid.iter().zip(components.iter()) {
            // Lower is better for everything except rank and bonded.
            let inclusion =
                scaled_lower_is_better(values.inclusion, &stats.inclusion) * weights.inclusion;
            let span_inclusion =
                scaled_lower_is_better(values.span_inclusion, &stats.span_inclusion)
                    * weights.span_inclusion;
            let discovered =
                scaled_lower_is_better(values.discovered, &stats.discovered) * weights.discovered;
            let nominated =
                scaled_lower_is_better(values.nominated, &stats.nominated) * weights.nominated;
            let rank = scaled(values.rank, &stats.rank) * weights.rank;
            let unclaimed =
                scaled_lower_is_better(values.unclaimed, &stats.unclaimed) * weights.unclaimed;
            let bonded = scaled(values.bonded, &stats.bonded) * weights.bonded;
            let faults = scaled_lower_is_better(values.faults, &stats.faults) * weights.faults;
            let offline =
                scaled_lower_is_better(values.offline, &stats.offline) * weights.offline;
            let ext_nominations =
                scaled_lower_is_better(values.ext_nominations, &stats.ext_nominations)
                    * weights.ext_nominations;

            let aggregate = inclusion
                + span_inclusion
                + discovered
                + nominated
                + rank
                + unclaimed
                + bonded
                + faults
                + offline
                + ext_nominations;
            let randomness = 1.0 + rand::random::<f64>() * weights.randomness;
            let total = aggregate * randomness;

            self.db
                .set_validator_score(ValidatorScore {
                    address: candidate.stash.clone(),
                    updated: now,
                    inclusion,
                    span_inclusion,
                    discovered,
                    nominated,
                    rank,
                    unclaimed,
                    bonded,
                    faults,
                    offline,
                    ext_nominations,
                    randomness,
                    aggregate,
                    total,
                })
                .await?;
            debug!(name = %candidate.name, total, "Candidate scored");
        }

        self.db
            .set_validator_score_metadata(ValidatorScoreMetadata {
                updated: now,
                bonded_stats: stats.bonded,
                bonded_weight: weights.bonded,
                faults_stats: stats.faults,
                faults_weight: weights.faults,
                inclusion_stats: stats.inclusion,
                inclusion_weight: weights.inclusion,
                span_inclusion_stats: stats.span_inclusion,
                span_inclusion_weight: weights.span_inclusion,
                discovered_at_stats: stats.discovered,
                discovered_weight: weights.discovered,
                nominated_at_stats: stats.nominated,
                nominated_weight: weights.nominated,
                offline_stats: stats.offline,
                offline_weight: weights.offline,
                rank_stats: stats.rank,
                rank_weight: weights.rank,
                unclaimed_stats: stats.unclaimed,
                unclaimed_weight: weights.unclaimed,
                ext_nominations_stats: stats.ext_nominations,
                ext_nominations_weight: weights.ext_nominations,
            })
            .await?;

        info!(scored = valid.len(), "Scoring pass complete");
        Ok(valid.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::ConstraintsEvaluator;
    use otv_chain::mock::MockChain;
    use otv_core::config::{ConstraintsConfig, Network};
    use otv_store::{MemoryStore, Store};
    use std::sync::Arc;

    fn evaluator(db: Arc<MemoryStore>) -> ConstraintsEvaluator {
        ConstraintsEvaluator::new(
            db,
            Arc::new(MockChain::new()),
            ConstraintsConfig::default(),
            Network::Kusama,
        )
    }

    async fn seed_valid(db: &MemoryStore, name: &str, stash: &str, bonded: u128) {
        db.add_candidate(name, stash, None).await.unwrap();
        db.set_bonded(stash, bonded).await.unwrap();
        db.set_valid(stash, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_population_scores_nothing() {
        let db = Arc::new(MemoryStore::new());
        let scored = evaluator(db.clone()).score_all_candidates().await.unwrap();
        assert_eq!(scored, 0);
        assert!(db.get_validator_score_metadata().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_population_of_one_is_well_defined() {
        let db = Arc::new(MemoryStore::new());
        seed_valid(&db, "Alice", "STASH_A", 1000).await;

        let scored = evaluator(db.clone()).score_all_candidates().await.unwrap();
        assert_eq!(scored, 1);

        let score = db.get_validator_score("STASH_A").await.unwrap().unwrap();
        assert!(score.total.is_finite());
        assert!(score.aggregate.is_finite());
        assert!(score.total >= score.aggregate);
    }

    #[tokio::test]
    async fn test_invalid_candidates_are_excluded() {
        let db = Arc::new(MemoryStore::new());
        seed_valid(&db, "Alice", "STASH_A", 1000).await;
        db.add_candidate("Bob", "STASH_B", None).await.unwrap();

        let scored = evaluator(db.clone()).score_all_candidates().await.unwrap();
        assert_eq!(scored, 1);
        assert!(db.get_validator_score("STASH_B").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_higher_bond_scores_higher_bonded_component() {
        let db = Arc::new(MemoryStore::new());
        seed_valid(&db, "Alice", "STASH_A", 10_000).await;
        seed_valid(&db, "Bob", "STASH_B", 100).await;

        evaluator(db.clone()).score_all_candidates().await.unwrap();

        let alice = db.get_validator_score("STASH_A").await.unwrap().unwrap();
        let bob = db.get_validator_score("STASH_B").await.unwrap().unwrap();
        assert!(alice.bonded > bob.bonded);
    }

    #[tokio::test]
    async fn test_metadata_snapshot_written() {
        let db = Arc::new(MemoryStore::new());
        seed_valid(&db, "Alice", "STASH_A", 1000).await;

        evaluator(db.clone()).score_all_candidates().await.unwrap();

        let metadata = db.get_validator_score_metadata().await.unwrap().unwrap();
        assert_eq!(metadata.bonded_stats.min, 1000.0);
        assert_eq!(metadata.bonded_stats.max, 1000.0);
        assert_eq!(metadata.inclusion_weight, 40.0);
    }
}
