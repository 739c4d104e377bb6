//! Era Stats Job
//!
//! Records the per-era fleet snapshot: total candidates, how many are
//! currently valid, how many are in the active set. Scheduled less
//! frequently than the jobs producing those fields.

use std::sync::Arc;
use tracing::info;

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let era = ctx.chain.get_active_era_index().await?;
    let candidates = ctx.db.get_all_candidates().await?;

    let total = candidates.len() as u32;
    let valid = candidates.iter().filter(|c| c.valid).count() as u32;
    let active = candidates.iter().filter(|c| c.active).count() as u32;

    ctx.db.set_era_stats(era, total, valid, active).await?;
    info!(era, total, valid, active, "Era stats recorded");
    Ok(())
}
