//! Validity Job
//!
//! Runs the full constraint evaluation over every candidate. A chain
//! failure for one candidate skips that candidate this tick; its
//! stale verdicts stand until the next successful pass.

use std::sync::Arc;
use tracing::{info, warn};

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let candidates = ctx.db.get_all_candidates().await?;
    let mut valid = 0;

    for candidate in &candidates {
        match ctx.constraints.check_candidate(candidate).await {
            Ok(true) => valid += 1,
            Ok(false) => {}
            Err(e) => {
                warn!(name = %candidate.name, error = %e, "Failed to evaluate candidate, skipping");
            }
        }
    }
    info!(valid, total = candidates.len(), "Validity pass complete");
    Ok(())
}
