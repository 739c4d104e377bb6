//! Chain Read Adapter
//!
//! Pull-only view of the blockchain consumed by the jobs and the
//! constraint evaluator. The real implementation wraps the RPC
//! client and serializes its socket internally; the core only ever
//! sees these read-shaped calls.

use async_trait::async_trait;

use otv_core::types::{ChainIdentity, RewardDestination};

use crate::error::ChainResult;
use crate::types::{
    ChainNomination, EraPointsTotals, NominatorSnapshot, ProxyAnnouncement, QueuedKeys,
};

/// Read-only chain access shared by all jobs
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Index of the era rewards are currently accumulating in
    async fn get_active_era_index(&self) -> ChainResult<u32>;

    /// Index of the planned era (may lead the active one)
    async fn get_current_era(&self) -> ChainResult<u32>;

    /// Era points of every validator for `era`
    async fn get_total_era_points(&self, era: u32) -> ChainResult<EraPointsTotals>;

    /// Stashes in the current validator set
    async fn get_current_validators(&self) -> ChainResult<Vec<String>>;

    /// Stashes with a registered validate intent (active and waiting)
    async fn get_validator_intentions(&self) -> ChainResult<Vec<String>>;

    /// Identity of `stash`, resolved through parent identities
    async fn get_formatted_identity(&self, stash: &str) -> ChainResult<Option<ChainIdentity>>;

    /// Commission of `stash` in raw parts-per-billion
    async fn get_commission(&self, stash: &str) -> ChainResult<u64>;

    /// Whether `stash` blocks external nominations
    async fn get_blocked(&self, stash: &str) -> ChainResult<bool>;

    async fn get_controller_from_stash(&self, stash: &str) -> ChainResult<Option<String>>;

    async fn get_reward_destination(&self, stash: &str) -> ChainResult<RewardDestination>;

    /// Bonded amount of `stash` in the smallest chain unit
    async fn get_bonded_amount(&self, stash: &str) -> ChainResult<u128>;

    /// Era indices with rewards not yet claimed for `stash`
    async fn get_unclaimed_eras(&self, stash: &str) -> ChainResult<Vec<u32>>;

    /// Queued session keys of every validator
    async fn get_queued_keys(&self) -> ChainResult<Vec<QueuedKeys>>;

    /// Next session keys of `stash`
    async fn get_next_keys(&self, stash: &str) -> ChainResult<Option<String>>;

    /// Best block height
    async fn get_latest_block(&self) -> ChainResult<u64>;

    /// Open proxy announcements made by `address`
    async fn get_proxy_announcements(&self, address: &str) -> ChainResult<Vec<ProxyAnnouncement>>;

    /// The nomination of `stash` as of `era`
    async fn get_nomination_at(
        &self,
        stash: &str,
        era: u32,
    ) -> ChainResult<Option<ChainNomination>>;

    /// All nominators with their targets and exposure
    async fn get_all_nominators(&self) -> ChainResult<Vec<NominatorSnapshot>>;

    /// Free balance of `address`
    async fn get_balance(&self, address: &str) -> ChainResult<u128>;
}
