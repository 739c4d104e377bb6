//! Cancel Job
//!
//! Cancels proxy announcements that were never executed: anything
//! older than twice the execution delay window is stale.

use std::sync::Arc;
use tracing::{info, warn};

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let current_block = ctx.chain.get_latest_block().await?;
    let stale_below = current_block.saturating_sub(2 * ctx.config.proxy.time_delay_blocks);

    for nominator in &ctx.nominators {
        let announcements = match ctx.chain.get_proxy_announcements(&nominator.address()).await
        {
            Ok(announcements) => announcements,
            Err(e) => {
                warn!(address = %nominator.address(), error = %e, "Failed to read announcements");
                continue;
            }
        };

        for announcement in announcements {
            if announcement.height >= stale_below {
                continue;
            }
            match nominator.cancel_tx(&announcement).await {
                Ok(()) => {
                    info!(
                        address = %nominator.address(),
                        call_hash = %announcement.call_hash,
                        height = announcement.height,
                        "Stale announcement cancelled"
                    );
                    ctx.notify(&format!(
                        "Cancelled stale announcement {} for {}",
                        announcement.call_hash,
                        nominator.address()
                    ))
                    .await;
                }
                Err(e) => {
                    warn!(
                        address = %nominator.address(),
                        call_hash = %announcement.call_hash,
                        error = %e,
                        "Failed to cancel announcement"
                    );
                }
            }
        }
    }
    Ok(())
}
