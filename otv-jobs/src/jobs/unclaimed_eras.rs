//! Unclaimed Era Job
//!
//! Refreshes each candidate's unclaimed reward eras and rewrites the
//! unclaimed-rewards invalidity verdict from the fresh data.

use std::sync::Arc;
use tracing::warn;

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    for candidate in ctx.db.get_all_candidates().await? {
        let eras = match ctx.chain.get_unclaimed_eras(&candidate.stash).await {
            Ok(eras) => eras,
            Err(e) => {
                warn!(name = %candidate.name, error = %e, "Failed to read unclaimed eras, skipping");
                continue;
            }
        };
        ctx.db.set_unclaimed_eras(&candidate.stash, eras).await?;

        // Re-verdict from the record just written.
        if let Some(current) = ctx.db.get_candidate(&candidate.stash).await? {
            if let Err(e) = ctx.constraints.check_unclaimed_eras(&current).await {
                warn!(name = %current.name, error = %e, "Failed to verdict unclaimed eras");
            }
        }
    }
    Ok(())
}
