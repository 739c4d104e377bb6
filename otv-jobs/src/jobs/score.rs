//! Score Job
//!
//! Runs the fleet scoring pass over the valid candidates.

use std::sync::Arc;

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    ctx.constraints.score_all_candidates().await?;
    Ok(())
}
