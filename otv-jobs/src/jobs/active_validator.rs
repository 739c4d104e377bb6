//! Active Validator Job
//!
//! Marks each candidate as in or out of the current validator set.

use std::sync::Arc;
use tracing::debug;

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let validators = ctx.chain.get_current_validators().await?;
    let candidates = ctx.db.get_all_candidates().await?;

    let mut active = 0;
    for candidate in &candidates {
        let is_active = validators.iter().any(|stash| stash == &candidate.stash);
        ctx.db.set_active(&candidate.stash, is_active).await?;
        if is_active {
            active += 1;
        }
    }
    debug!(active, total = candidates.len(), "Active validator flags refreshed");
    Ok(())
}
