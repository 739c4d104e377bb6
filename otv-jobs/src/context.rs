//! Job Context
//!
//! The shared collaborators every job body closes over: the store,
//! the chain adapter, the constraint evaluator, the configuration and
//! the injected action capabilities. All of them are long-lived for
//! the process lifetime; jobs hold no state of their own between
//! invocations.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use otv_chain::{Bot, ChainProvider, ChainResult, NominatorAccount, RewardClaimer};
use otv_constraints::ConstraintsEvaluator;
use otv_core::config::Config;
use otv_core::types::Release;
use otv_store::Store;

/// Upstream client release feed consumed by the monitor job
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    async fn latest_release(&self) -> ChainResult<Release>;
}

/// Shared collaborators passed to every job
pub struct JobContext {
    pub db: Arc<dyn Store>,
    pub chain: Arc<dyn ChainProvider>,
    pub constraints: Arc<ConstraintsEvaluator>,
    pub config: Config,
    /// Controlled nominator accounts, in nomination order
    pub nominators: Vec<Arc<dyn NominatorAccount>>,
    pub claimer: Option<Arc<dyn RewardClaimer>>,
    pub bot: Option<Arc<dyn Bot>>,
    pub release_feed: Option<Arc<dyn ReleaseFeed>>,
}

impl JobContext {
    /// Send a bot notification when a bot is configured; delivery
    /// failures are logged, never propagated
    pub async fn notify(&self, message: &str) {
        if let Some(bot) = &self.bot {
            if let Err(e) = bot.send_message(message).await {
                warn!(error = %e, "Failed to deliver bot notification");
            }
        }
    }
}
