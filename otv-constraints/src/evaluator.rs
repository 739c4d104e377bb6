//! Candidate Evaluation
//!
//! Computes every typed invalidity verdict for a candidate and writes
//! each through the store's type-specific setter, then derives the
//! overall verdict as the conjunction of the recorded entries.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use otv_chain::ChainProvider;
use otv_core::config::{ConstraintsConfig, Network};
use otv_core::types::{Candidate, InvalidityType, RewardDestination};
use otv_store::Store;

use crate::error::ConstraintsResult;

/// Evaluates candidates against the program rules and scores the fleet
pub struct ConstraintsEvaluator {
    pub(crate) db: Arc<dyn Store>,
    pub(crate) chain: Arc<dyn ChainProvider>,
    pub(crate) config: ConstraintsConfig,
    pub(crate) network: Network,
}

impl ConstraintsEvaluator {
    pub fn new(
        db: Arc<dyn Store>,
        chain: Arc<dyn ChainProvider>,
        config: ConstraintsConfig,
        network: Network,
    ) -> Self {
        Self {
            db,
            chain,
            config,
            network,
        }
    }

    /// Evaluate all invalidity types for one candidate and persist the
    /// verdicts. Returns the resulting overall validity. A chain
    /// failure aborts only this candidate; the caller moves on to the
    /// next one.
    pub async fn check_candidate(&self, candidate: &Candidate) -> ConstraintsResult<bool> {
        self.check_online(candidate).await?;
        self.check_validate_intention(candidate).await?;
        self.check_client_upgrade(candidate).await?;
        self.check_connection_time(candidate).await?;
        self.check_identity(candidate).await?;
        self.check_offline_accumulated(candidate).await?;
        self.check_reward_destination(candidate).await?;
        self.check_commission(candidate).await?;
        self.check_self_stake(candidate).await?;
        self.check_unclaimed_eras(candidate).await?;
        self.check_blocked(candidate).await?;
        self.check_kusama_rank(candidate).await?;

        // The conjunction is taken over the freshly written entries.
        let valid = match self.db.get_candidate(&candidate.stash).await? {
            Some(current) => current.invalidity.all_valid(),
            None => false,
        };
        self.db.set_valid(&candidate.stash, valid).await?;
        debug!(name = %candidate.name, valid, "Candidate evaluated");
        Ok(valid)
    }

    async fn check_online(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let valid = candidate.is_online();
        let details = if valid {
            String::new()
        } else {
            match candidate.offline_since {
                Some(since) => format!("{} offline since {}", candidate.name, since),
                None => format!("{} has never been seen online", candidate.name),
            }
        };
        self.db
            .set_invalidity(&candidate.stash, InvalidityType::Online, valid, &details)
            .await?;
        Ok(())
    }

    async fn check_validate_intention(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let intentions = self.chain.get_validator_intentions().await?;
        let valid = intentions.iter().any(|stash| stash == &candidate.stash);
        let details = if valid {
            String::new()
        } else {
            format!("{} does not have a validate intention", candidate.name)
        };
        self.db
            .set_invalidity(
                &candidate.stash,
                InvalidityType::ValidateIntention,
                valid,
                &details,
            )
            .await?;
        Ok(())
    }

    async fn check_client_upgrade(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let latest = self.db.get_latest_release().await?;

        let (valid, details) = match (latest, candidate.version.as_deref()) {
            // Nothing to compare against yet.
            (None, _) => (true, String::new()),
            (Some(_), None) => (
                false,
                format!("{} has not reported a client version", candidate.name),
            ),
            (Some(release), Some(version)) => {
                let grace_expired = (Utc::now() - release.published_at).num_milliseconds()
                    > self.config.client_upgrade_grace_ms;
                if version_at_least(version, &release.name) || !grace_expired {
                    (true, String::new())
                } else {
                    (
                        false,
                        format!(
                            "{} is running {}, below release {}",
                            candidate.name, version, release.name
                        ),
                    )
                }
            }
        };
        self.db.set_updated(&candidate.stash, valid).await?;
        self.db
            .set_invalidity(
                &candidate.stash,
                InvalidityType::ClientUpgrade,
                valid,
                &details,
            )
            .await?;
        Ok(())
    }

    async fn check_connection_time(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let valid = match candidate.discovered_at {
            Some(discovered_at) => {
                (Utc::now() - discovered_at).num_milliseconds()
                    >= self.config.min_connection_time_ms
            }
            None => false,
        };
        let details = if valid {
            String::new()
        } else {
            format!("{} has not been connected long enough", candidate.name)
        };
        self.db
            .set_invalidity(
                &candidate.stash,
                InvalidityType::ConnectionTime,
                valid,
                &details,
            )
            .await?;
        Ok(())
    }

    async fn check_identity(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let valid = candidate
            .identity
            .as_ref()
            .map(|identity| identity.verified)
            .unwrap_or(false);
        let details = if valid {
            String::new()
        } else if candidate.identity.is_some() {
            format!("{} has an unverified identity", candidate.name)
        } else {
            format!("{} has no on-chain identity", candidate.name)
        };
        self.db
            .set_invalidity(&candidate.stash, InvalidityType::Identity, valid, &details)
            .await?;
        Ok(())
    }

    async fn check_offline_accumulated(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let valid = candidate.offline_accumulated <= self.config.max_accumulated_offline_ms;
        let details = if valid {
            String::new()
        } else {
            format!(
                "{} has accumulated {} ms offline this week",
                candidate.name, candidate.offline_accumulated
            )
        };
        self.db
            .set_invalidity(
                &candidate.stash,
                InvalidityType::AccumulatedOfflineTime,
                valid,
                &details,
            )
            .await?;
        Ok(())
    }

    async fn check_reward_destination(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let valid = matches!(
            candidate.reward_destination,
            Some(RewardDestination::Staked)
        );
        let details = if valid {
            String::new()
        } else {
            format!("{} reward destination is not Staked", candidate.name)
        };
        self.db
            .set_invalidity(
                &candidate.stash,
                InvalidityType::RewardDestination,
                valid,
                &details,
            )
            .await?;
        Ok(())
    }

    async fn check_commission(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let valid = candidate.commission <= self.config.commission_cap;
        let details = if valid {
            String::new()
        } else {
            format!(
                "{} commission {}% is above the {}% cap",
                candidate.name, candidate.commission, self.config.commission_cap
            )
        };
        self.db
            .set_invalidity(
                &candidate.stash,
                InvalidityType::Commission,
                valid,
                &details,
            )
            .await?;
        Ok(())
    }

    async fn check_self_stake(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let valid = candidate
            .bonded
            .map(|bonded| bonded >= self.config.min_self_stake)
            .unwrap_or(false);
        let details = if valid {
            String::new()
        } else {
            format!("{} self stake is below the program minimum", candidate.name)
        };
        self.db
            .set_invalidity(&candidate.stash, InvalidityType::SelfStake, valid, &details)
            .await?;
        Ok(())
    }

    /// Public because the unclaimed-era scan writes this verdict
    /// outside a full evaluation pass
    pub async fn check_unclaimed_eras(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let active_era = self.chain.get_active_era_index().await?;
        let threshold = self.network.unclaimed_era_threshold();
        let cutoff = active_era.saturating_sub(threshold);

        let stale: Vec<u32> = candidate
            .unclaimed_eras
            .iter()
            .copied()
            .filter(|era| *era < cutoff)
            .collect();
        let valid = stale.is_empty();
        let details = if valid {
            String::new()
        } else {
            format!(
                "{} has unclaimed rewards older than {} eras: {:?}",
                candidate.name, threshold, stale
            )
        };
        self.db
            .set_invalidity(
                &candidate.stash,
                InvalidityType::UnclaimedRewards,
                valid,
                &details,
            )
            .await?;
        Ok(())
    }

    async fn check_blocked(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let blocked = self.chain.get_blocked(&candidate.stash).await?;
        let details = if blocked {
            format!("{} blocks external nominations", candidate.name)
        } else {
            String::new()
        };
        self.db
            .set_invalidity(
                &candidate.stash,
                InvalidityType::Blocked,
                !blocked,
                &details,
            )
            .await?;
        Ok(())
    }

    async fn check_kusama_rank(&self, candidate: &Candidate) -> ConstraintsResult<()> {
        let (valid, details) = if self.config.skip_kusama_rank
            || candidate.kusama_stash.is_none()
        {
            (true, String::new())
        } else {
            match candidate.kusama_rank {
                Some(rank) if rank >= self.config.min_kusama_rank => (true, String::new()),
                Some(rank) => (
                    false,
                    format!(
                        "{} sibling-chain rank {} is below {}",
                        candidate.name, rank, self.config.min_kusama_rank
                    ),
                ),
                None => (
                    false,
                    format!("{} sibling-chain rank is unknown", candidate.name),
                ),
            }
        };
        self.db
            .set_invalidity(
                &candidate.stash,
                InvalidityType::KusamaRank,
                valid,
                &details,
            )
            .await?;
        Ok(())
    }
}

/// Whether `version` is at or above `release`, comparing the numeric
/// (major, minor, patch) triples and ignoring leading `v` and any
/// build suffix after `-`
pub fn version_at_least(version: &str, release: &str) -> bool {
    match (parse_version(version), parse_version(release)) {
        (Some(a), Some(b)) => a >= b,
        _ => false,
    }
}

fn parse_version(raw: &str) -> Option<(u32, u32, u32)> {
    let trimmed = raw.trim().trim_start_matches('v');
    let numeric = trimmed.split('-').next()?;
    let mut parts = numeric.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().unwrap_or("0").parse().ok()?;
    let patch = parts.next().unwrap_or("0").parse().ok()?;
    Some((major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use otv_chain::mock::MockChain;
    use otv_core::types::ChainIdentity;
    use otv_store::MemoryStore;

    /// Relaxed connection-time minimum so freshly seeded candidates
    /// can pass every check
    fn test_config() -> ConstraintsConfig {
        ConstraintsConfig {
            min_connection_time_ms: 0,
            ..Default::default()
        }
    }

    fn evaluator(db: Arc<MemoryStore>, chain: MockChain) -> ConstraintsEvaluator {
        ConstraintsEvaluator::new(db, Arc::new(chain), test_config(), Network::Kusama)
    }

    /// A candidate that passes every check against the given chain
    async fn seed_good_candidate(db: &MemoryStore, chain: &MockChain) {
        db.add_candidate("Alice", "STASH_A", None).await.unwrap();
        db.report_online("Alice", 1, "1.0.0").await.unwrap();
        db.set_identity(
            "STASH_A",
            ChainIdentity {
                name: "Alice".into(),
                sub: None,
                verified: true,
            },
        )
        .await
        .unwrap();
        db.set_commission("STASH_A", 5.0).await.unwrap();
        db.set_bonded("STASH_A", test_config().min_self_stake)
            .await
            .unwrap();
        db.set_reward_destination("STASH_A", RewardDestination::Staked)
            .await
            .unwrap();

        chain
            .set(|state| {
                state.active_era = 100;
                state.intentions = vec!["STASH_A".into()];
            })
            .await;
    }

    #[tokio::test]
    async fn test_check_candidate_writes_all_types() {
        let db = Arc::new(MemoryStore::new());
        let chain = MockChain::new();
        seed_good_candidate(&db, &chain).await;

        let evaluator = evaluator(db.clone(), chain);
        let candidate = db.get_candidate("STASH_A").await.unwrap().unwrap();
        evaluator.check_candidate(&candidate).await.unwrap();

        let evaluated = db.get_candidate("STASH_A").await.unwrap().unwrap();
        assert_eq!(evaluated.invalidity.len(), InvalidityType::ALL.len());
    }

    #[tokio::test]
    async fn test_overall_valid_is_conjunction() {
        let db = Arc::new(MemoryStore::new());
        let chain = MockChain::new();
        seed_good_candidate(&db, &chain).await;
        // Push commission above the cap so exactly one check fails.
        db.set_commission("STASH_A", 50.0).await.unwrap();

        let evaluator = evaluator(db.clone(), chain);
        let candidate = db.get_candidate("STASH_A").await.unwrap().unwrap();
        let valid = evaluator.check_candidate(&candidate).await.unwrap();
        assert!(!valid);

        let evaluated = db.get_candidate("STASH_A").await.unwrap().unwrap();
        assert!(!evaluated.valid);
        assert!(!evaluated
            .invalidity
            .get(InvalidityType::Commission)
            .unwrap()
            .valid);
    }

    #[tokio::test]
    async fn test_chain_failure_propagates() {
        let db = Arc::new(MemoryStore::new());
        let chain = MockChain::new();
        seed_good_candidate(&db, &chain).await;
        chain.set(|state| state.fail_rpc = true).await;

        let evaluator = evaluator(db.clone(), chain);
        let candidate = db.get_candidate("STASH_A").await.unwrap().unwrap();
        assert!(evaluator.check_candidate(&candidate).await.is_err());
    }

    #[tokio::test]
    async fn test_unclaimed_rewards_threshold() {
        let db = Arc::new(MemoryStore::new());
        let chain = MockChain::new();
        seed_good_candidate(&db, &chain).await;
        // Era 100 with a Kusama threshold of 16: era 83 is stale, 84 is not.
        db.set_unclaimed_eras("STASH_A", vec![84]).await.unwrap();

        let evaluator = evaluator(db.clone(), chain);
        let candidate = db.get_candidate("STASH_A").await.unwrap().unwrap();
        evaluator.check_candidate(&candidate).await.unwrap();
        let evaluated = db.get_candidate("STASH_A").await.unwrap().unwrap();
        assert!(evaluated
            .invalidity
            .get(InvalidityType::UnclaimedRewards)
            .unwrap()
            .valid);

        db.set_unclaimed_eras("STASH_A", vec![83]).await.unwrap();
        let candidate = db.get_candidate("STASH_A").await.unwrap().unwrap();
        evaluator.check_candidate(&candidate).await.unwrap();
        let evaluated = db.get_candidate("STASH_A").await.unwrap().unwrap();
        assert!(!evaluated
            .invalidity
            .get(InvalidityType::UnclaimedRewards)
            .unwrap()
            .valid);
    }

    #[tokio::test]
    async fn test_kusama_rank_skipped_without_sibling_stash() {
        let db = Arc::new(MemoryStore::new());
        let chain = MockChain::new();
        seed_good_candidate(&db, &chain).await;

        let evaluator = evaluator(db.clone(), chain);
        let candidate = db.get_candidate("STASH_A").await.unwrap().unwrap();
        evaluator.check_candidate(&candidate).await.unwrap();

        let evaluated = db.get_candidate("STASH_A").await.unwrap().unwrap();
        assert!(evaluated
            .invalidity
            .get(InvalidityType::KusamaRank)
            .unwrap()
            .valid);
    }

    #[test]
    fn test_version_at_least() {
        assert!(version_at_least("1.2.0", "v1.2.0"));
        assert!(version_at_least("v1.3.0", "v1.2.9"));
        assert!(version_at_least("1.2.0-abcdef", "v1.2.0"));
        assert!(!version_at_least("0.9.0", "v1.0.0"));
        assert!(!version_at_least("garbage", "v1.0.0"));
    }
}
