//! External Nominations Job
//!
//! Aggregates the total external nomination exposure per candidate
//! from the chain's nominators map. The totals are only reported in
//! the logs; persisting them per candidate is still pending.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let nominators = ctx.chain.get_all_nominators().await?;
    let candidates = ctx.db.get_all_candidates().await?;

    let mut totals: HashMap<&str, u128> = HashMap::new();
    for nominator in &nominators {
        for target in &nominator.targets {
            if candidates.iter().any(|c| &c.stash == target) {
                *totals.entry(target.as_str()).or_default() += nominator.bonded;
            }
        }
    }

    for (stash, total) in &totals {
        debug!(stash = %stash, total, "External nomination exposure");
    }
    debug!(candidates = totals.len(), "External nomination scan complete");
    Ok(())
}
