//! Release Monitor Job
//!
//! Records the latest upstream client release. The client-upgrade
//! check compares candidate versions against this record.

use std::sync::Arc;
use tracing::{debug, info};

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let Some(feed) = &ctx.release_feed else {
        debug!("No release feed configured, skipping");
        return Ok(());
    };

    let release = feed.latest_release().await?;
    ctx.db
        .set_release(&release.name, release.published_at)
        .await?;
    info!(release = %release.name, "Latest release recorded");
    Ok(())
}
