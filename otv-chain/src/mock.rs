//! Mock Chain Harness
//!
//! In-memory implementations of the adapter and capability traits for
//! tests. The chain state is a plain snapshot behind a lock; tests
//! mutate it between job ticks to simulate chain progress.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use otv_core::types::{ChainIdentity, RewardDestination};

use crate::capabilities::{Bot, NominatorAccount, RewardClaimer};
use crate::error::{ChainError, ChainResult};
use crate::provider::ChainProvider;
use crate::types::{
    ChainNomination, EraPointsTotals, EraReward, NominatorSnapshot, ProxyAnnouncement, QueuedKeys,
};

/// Snapshot of the simulated chain
#[derive(Debug, Clone, Default)]
pub struct MockChainState {
    pub active_era: u32,
    pub current_era: u32,
    pub latest_block: u64,
    pub validators: Vec<String>,
    pub intentions: Vec<String>,
    pub era_points: HashMap<u32, EraPointsTotals>,
    pub identities: HashMap<String, ChainIdentity>,
    /// Commission per stash in raw parts-per-billion
    pub commissions: HashMap<String, u64>,
    pub blocked: HashMap<String, bool>,
    pub controllers: HashMap<String, String>,
    pub reward_destinations: HashMap<String, RewardDestination>,
    pub bonded: HashMap<String, u128>,
    pub unclaimed_eras: HashMap<String, Vec<u32>>,
    pub queued_keys: Vec<QueuedKeys>,
    pub next_keys: HashMap<String, String>,
    pub announcements: HashMap<String, Vec<ProxyAnnouncement>>,
    pub nominations: HashMap<String, ChainNomination>,
    pub nominators: Vec<NominatorSnapshot>,
    pub balances: HashMap<String, u128>,
    /// When set, every call fails as a transient RPC error
    pub fail_rpc: bool,
}

/// Mock chain adapter
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    state: Arc<RwLock<MockChainState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the simulated chain state
    pub async fn set<F>(&self, f: F)
    where
        F: FnOnce(&mut MockChainState),
    {
        f(&mut *self.state.write().await);
    }

    pub async fn snapshot(&self) -> MockChainState {
        self.state.read().await.clone()
    }

    async fn guard(&self) -> ChainResult<()> {
        if self.state.read().await.fail_rpc {
            return Err(ChainError::Rpc("mock transport down".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainProvider for MockChain {
    async fn get_active_era_index(&self) -> ChainResult<u32> {
        self.guard().await?;
        Ok(self.state.read().await.active_era)
    }

    async fn get_current_era(&self) -> ChainResult<u32> {
        self.guard().await?;
        Ok(self.state.read().await.current_era)
    }

    async fn get_total_era_points(&self, era: u32) -> ChainResult<EraPointsTotals> {
        self.guard().await?;
        self.state
            .read()
            .await
            .era_points
            .get(&era)
            .cloned()
            .ok_or_else(|| ChainError::NotFound(format!("era points for era {era}")))
    }

    async fn get_current_validators(&self) -> ChainResult<Vec<String>> {
        self.guard().await?;
        Ok(self.state.read().await.validators.clone())
    }

    async fn get_validator_intentions(&self) -> ChainResult<Vec<String>> {
        self.guard().await?;
        Ok(self.state.read().await.intentions.clone())
    }

    async fn get_formatted_identity(&self, stash: &str) -> ChainResult<Option<ChainIdentity>> {
        self.guard().await?;
        Ok(self.state.read().await.identities.get(stash).cloned())
    }

    async fn get_commission(&self, stash: &str) -> ChainResult<u64> {
        self.guard().await?;
        Ok(self
            .state
            .read()
            .await
            .commissions
            .get(stash)
            .copied()
            .unwrap_or(0))
    }

    async fn get_blocked(&self, stash: &str) -> ChainResult<bool> {
        self.guard().await?;
        Ok(self
            .state
            .read()
            .await
            .blocked
            .get(stash)
            .copied()
            .unwrap_or(false))
    }

    async fn get_controller_from_stash(&self, stash: &str) -> ChainResult<Option<String>> {
        self.guard().await?;
        Ok(self.state.read().await.controllers.get(stash).cloned())
    }

    async fn get_reward_destination(&self, stash: &str) -> ChainResult<RewardDestination> {
        self.guard().await?;
        Ok(self
            .state
            .read()
            .await
            .reward_destinations
            .get(stash)
            .cloned()
            .unwrap_or(RewardDestination::None))
    }

    async fn get_bonded_amount(&self, stash: &str) -> ChainResult<u128> {
        self.guard().await?;
        Ok(self
            .state
            .read()
            .await
            .bonded
            .get(stash)
            .copied()
            .unwrap_or(0))
    }

    async fn get_unclaimed_eras(&self, stash: &str) -> ChainResult<Vec<u32>> {
        self.guard().await?;
        Ok(self
            .state
            .read()
            .await
            .unclaimed_eras
            .get(stash)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_queued_keys(&self) -> ChainResult<Vec<QueuedKeys>> {
        self.guard().await?;
        Ok(self.state.read().await.queued_keys.clone())
    }

    async fn get_next_keys(&self, stash: &str) -> ChainResult<Option<String>> {
        self.guard().await?;
        Ok(self.state.read().await.next_keys.get(stash).cloned())
    }

    async fn get_latest_block(&self) -> ChainResult<u64> {
        self.guard().await?;
        Ok(self.state.read().await.latest_block)
    }

    async fn get_proxy_announcements(
        &self,
        address: &str,
    ) -> ChainResult<Vec<ProxyAnnouncement>> {
        self.guard().await?;
        Ok(self
            .state
            .read()
            .await
            .announcements
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_nomination_at(
        &self,
        stash: &str,
        _era: u32,
    ) -> ChainResult<Option<ChainNomination>> {
        self.guard().await?;
        Ok(self.state.read().await.nominations.get(stash).cloned())
    }

    async fn get_all_nominators(&self) -> ChainResult<Vec<NominatorSnapshot>> {
        self.guard().await?;
        Ok(self.state.read().await.nominators.clone())
    }

    async fn get_balance(&self, address: &str) -> ChainResult<u128> {
        self.guard().await?;
        Ok(self
            .state
            .read()
            .await
            .balances
            .get(address)
            .copied()
            .unwrap_or(0))
    }
}

/// A recorded staking submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentStakingTx {
    pub call_hash: String,
    pub targets: Vec<String>,
}

/// Mock nominator account recording every submission
#[derive(Debug, Default)]
pub struct MockNominator {
    pub address: String,
    pub stash: String,
    pub controller: String,
    pub proxy: bool,
    pub fail_submissions: bool,
    sent: Mutex<Vec<SentStakingTx>>,
    cancelled: Mutex<Vec<String>>,
}

impl MockNominator {
    pub fn new(address: &str, stash: &str, controller: &str) -> Self {
        Self {
            address: address.to_string(),
            stash: stash.to_string(),
            controller: controller.to_string(),
            proxy: true,
            ..Default::default()
        }
    }

    pub fn with_fail_submissions(mut self, fail: bool) -> Self {
        self.fail_submissions = fail;
        self
    }

    pub async fn sent(&self) -> Vec<SentStakingTx> {
        self.sent.lock().await.clone()
    }

    pub async fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().await.clone()
    }
}

#[async_trait]
impl NominatorAccount for MockNominator {
    fn address(&self) -> String {
        self.address.clone()
    }

    fn stash(&self) -> String {
        self.stash.clone()
    }

    fn controller(&self) -> String {
        self.controller.clone()
    }

    fn is_proxy(&self) -> bool {
        self.proxy
    }

    async fn send_staking_tx(&self, call_hash: &str, targets: &[String]) -> ChainResult<()> {
        if self.fail_submissions {
            return Err(ChainError::Submission("mock failure mode enabled".into()));
        }
        self.sent.lock().await.push(SentStakingTx {
            call_hash: call_hash.to_string(),
            targets: targets.to_vec(),
        });
        Ok(())
    }

    async fn cancel_tx(&self, announcement: &ProxyAnnouncement) -> ChainResult<()> {
        if self.fail_submissions {
            return Err(ChainError::Submission("mock failure mode enabled".into()));
        }
        self.cancelled.lock().await.push(announcement.call_hash.clone());
        Ok(())
    }
}

/// Mock reward claimer recording every batch
#[derive(Debug, Default)]
pub struct MockClaimer {
    pub address: String,
    claims: Mutex<Vec<Vec<EraReward>>>,
}

impl MockClaimer {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            claims: Mutex::new(Vec::new()),
        }
    }

    pub async fn claims(&self) -> Vec<Vec<EraReward>> {
        self.claims.lock().await.clone()
    }
}

#[async_trait]
impl RewardClaimer for MockClaimer {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn claim(&self, rewards: &[EraReward]) -> ChainResult<()> {
        self.claims.lock().await.push(rewards.to_vec());
        Ok(())
    }
}

/// Mock bot recording every message
#[derive(Debug, Default)]
pub struct MockBot {
    messages: Mutex<Vec<String>>,
}

impl MockBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, message: &str) -> ChainResult<()> {
        self.messages.lock().await.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_chain_state_mutation() {
        let chain = MockChain::new();
        chain
            .set(|state| {
                state.active_era = 100;
                state.latest_block = 5000;
                state.validators = vec!["STASH_A".into()];
            })
            .await;

        assert_eq!(chain.get_active_era_index().await.unwrap(), 100);
        assert_eq!(chain.get_latest_block().await.unwrap(), 5000);
        assert_eq!(
            chain.get_current_validators().await.unwrap(),
            vec!["STASH_A".to_string()]
        );
    }

    #[tokio::test]
    async fn test_mock_chain_fail_mode() {
        let chain = MockChain::new();
        chain.set(|state| state.fail_rpc = true).await;
        assert!(chain.get_active_era_index().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_nominator_records_submissions() {
        let nominator = MockNominator::new("ADDR", "STASH", "CTRL");
        nominator
            .send_staking_tx("0xhash", &["T1".to_string()])
            .await
            .unwrap();

        let sent = nominator.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].call_hash, "0xhash");
    }

    #[tokio::test]
    async fn test_mock_nominator_fail_mode() {
        let nominator =
            MockNominator::new("ADDR", "STASH", "CTRL").with_fail_submissions(true);
        assert!(nominator.send_staking_tx("0xhash", &[]).await.is_err());
        assert!(nominator.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_mock_bot_records_messages() {
        let bot = MockBot::new();
        bot.send_message("hello").await.unwrap();
        assert_eq!(bot.messages().await, vec!["hello".to_string()]);
    }
}
