//! Session Key Job
//!
//! Refreshes each candidate's queued and next session keys.

use std::sync::Arc;
use tracing::warn;

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let queued = ctx.chain.get_queued_keys().await?;

    for candidate in ctx.db.get_all_candidates().await? {
        if let Some(entry) = queued.iter().find(|q| q.address == candidate.stash) {
            ctx.db
                .set_queued_keys(&candidate.stash, &entry.keys)
                .await?;
        }

        match ctx.chain.get_next_keys(&candidate.stash).await {
            Ok(Some(keys)) => ctx.db.set_next_keys(&candidate.stash, &keys).await?,
            Ok(None) => {}
            Err(e) => {
                warn!(name = %candidate.name, error = %e, "Failed to read next keys, skipping");
            }
        }
    }
    Ok(())
}
