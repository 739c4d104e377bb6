//! Stale Nomination Job
//!
//! Flags controlled nominators whose on-chain nomination has not been
//! refreshed for too many eras. Notification only; no state changes.

use std::sync::Arc;
use tracing::warn;

use crate::context::JobContext;
use crate::error::JobResult;

/// Eras a nomination may age before it is flagged
const STALE_ERA_THRESHOLD: u32 = 8;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let current_era = ctx.chain.get_current_era().await?;

    for nominator in &ctx.nominators {
        let stash = nominator.stash();
        let nomination = match ctx.chain.get_nomination_at(&stash, current_era).await {
            Ok(nomination) => nomination,
            Err(e) => {
                warn!(stash = %stash, error = %e, "Failed to read nomination");
                continue;
            }
        };

        match nomination {
            Some(nomination)
                if nomination.submitted_in + STALE_ERA_THRESHOLD < current_era =>
            {
                warn!(
                    stash = %stash,
                    submitted_in = nomination.submitted_in,
                    current_era,
                    "Stale nomination"
                );
                ctx.notify(&format!(
                    "Nominator {} has a stale nomination (submitted in era {}, now {})",
                    stash, nomination.submitted_in, current_era
                ))
                .await;
            }
            Some(_) => {}
            None => {
                ctx.notify(&format!("Nominator {stash} has no current nomination"))
                    .await;
            }
        }
    }
    Ok(())
}
