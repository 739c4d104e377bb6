//! Weekly Offline Reset Job
//!
//! Zeroes every candidate's accumulated offline time. Scheduled once
//! a week so the offline cap is measured per week.

use std::sync::Arc;
use tracing::info;

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    ctx.db.clear_accumulated_offline_time().await?;
    info!("Accumulated offline time cleared");
    Ok(())
}
