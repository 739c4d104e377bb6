//! Test Harness
//!
//! Builders wiring a [`JobContext`] over the in-memory store and the
//! mock chain. Used by the crate's own tests and by downstream
//! integration tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use otv_chain::mock::{MockBot, MockChain, MockClaimer, MockNominator};
use otv_chain::{Bot, ChainResult, NominatorAccount, RewardClaimer};
use otv_constraints::ConstraintsEvaluator;
use otv_core::config::Config;
use otv_core::types::Release;
use otv_store::MemoryStore;

use crate::context::{JobContext, ReleaseFeed};

/// Release feed serving a fixed release
#[derive(Debug, Default)]
pub struct MockReleaseFeed {
    release: Mutex<Option<Release>>,
}

impl MockReleaseFeed {
    pub fn new(release: Release) -> Self {
        Self {
            release: Mutex::new(Some(release)),
        }
    }
}

#[async_trait]
impl ReleaseFeed for MockReleaseFeed {
    async fn latest_release(&self) -> ChainResult<Release> {
        self.release
            .lock()
            .await
            .clone()
            .ok_or_else(|| otv_chain::ChainError::NotFound("no release".into()))
    }
}

/// Start building a job context over fresh mocks
pub fn context() -> ContextBuilder {
    ContextBuilder::default()
}

/// Builder for a fully wired [`JobContext`]
#[derive(Default)]
pub struct ContextBuilder {
    db: Option<Arc<MemoryStore>>,
    chain: Option<Arc<MockChain>>,
    config: Option<Config>,
    nominators: Vec<Arc<MockNominator>>,
    claimer: Option<Arc<MockClaimer>>,
    bot: Option<Arc<MockBot>>,
    release_feed: Option<Arc<MockReleaseFeed>>,
}

impl ContextBuilder {
    pub fn with_db(mut self, db: Arc<MemoryStore>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_chain(mut self, chain: Arc<MockChain>) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_nominator(mut self, nominator: Arc<MockNominator>) -> Self {
        self.nominators.push(nominator);
        self
    }

    pub fn with_claimer(mut self, claimer: Arc<MockClaimer>) -> Self {
        self.claimer = Some(claimer);
        self
    }

    pub fn with_bot(mut self, bot: Arc<MockBot>) -> Self {
        self.bot = Some(bot);
        self
    }

    pub fn with_release_feed(mut self, feed: Arc<MockReleaseFeed>) -> Self {
        self.release_feed = Some(feed);
        self
    }

    pub fn build(self) -> Arc<JobContext> {
        let db = self.db.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let chain = self.chain.unwrap_or_else(|| Arc::new(MockChain::new()));
        let config = self.config.unwrap_or_default();

        let constraints = Arc::new(ConstraintsEvaluator::new(
            db.clone(),
            chain.clone(),
            config.constraints.clone(),
            config.global.network(),
        ));

        Arc::new(JobContext {
            db,
            chain,
            constraints,
            config,
            nominators: self
                .nominators
                .into_iter()
                .map(|n| n as Arc<dyn NominatorAccount>)
                .collect(),
            claimer: self.claimer.map(|c| c as Arc<dyn RewardClaimer>),
            bot: self.bot.map(|b| b as Arc<dyn Bot>),
            release_feed: self.release_feed.map(|f| f as Arc<dyn ReleaseFeed>),
        })
    }
}
