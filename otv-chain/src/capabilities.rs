//! Injected Capabilities
//!
//! Side-effecting collaborators consumed by the action jobs.
//! Transaction signing and message delivery stay outside the core;
//! the jobs only see these traits.

use async_trait::async_trait;

use crate::error::ChainResult;
use crate::types::{EraReward, ProxyAnnouncement};

/// A controlled nominator account able to sign staking calls
#[async_trait]
pub trait NominatorAccount: Send + Sync {
    /// Signing address (proxy or controller key)
    fn address(&self) -> String;

    /// Stash the nominations are bonded from
    fn stash(&self) -> String;

    /// Controller paired with the stash
    fn controller(&self) -> String;

    /// Whether nominations go through an announced proxy
    fn is_proxy(&self) -> bool;

    /// Execute a previously announced nominate call
    async fn send_staking_tx(&self, call_hash: &str, targets: &[String]) -> ChainResult<()>;

    /// Cancel a stale proxy announcement
    async fn cancel_tx(&self, announcement: &ProxyAnnouncement) -> ChainResult<()>;
}

/// An account that claims validator rewards on behalf of the fleet
#[async_trait]
pub trait RewardClaimer: Send + Sync {
    fn address(&self) -> String;

    /// Submit one batched claim for the given (era, stash) pairs
    async fn claim(&self, rewards: &[EraReward]) -> ChainResult<()>;
}

/// Optional notification channel
#[async_trait]
pub trait Bot: Send + Sync {
    async fn send_message(&self, message: &str) -> ChainResult<()>;
}
