//! Execution Job
//!
//! Executes delayed nomination transactions once their announcement
//! window has elapsed: for every recorded intent whose block number
//! plus the configured delay is at or below the current block, the
//! owning nominator submits the announced call. The row is deleted on
//! success and left for the next tick on failure.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let current_block = ctx.chain.get_latest_block().await?;
    let delay = ctx.config.proxy.time_delay_blocks;

    for tx in ctx.db.get_all_delayed_txs().await? {
        if tx.number + delay > current_block {
            continue;
        }

        let Some(nominator) = ctx
            .nominators
            .iter()
            .find(|n| n.controller() == tx.controller)
        else {
            warn!(controller = %tx.controller, "No nominator owns this delayed tx, leaving it");
            continue;
        };

        match nominator.send_staking_tx(&tx.call_hash, &tx.targets).await {
            Ok(()) => {
                ctx.db.delete_delayed_tx(tx.number, &tx.controller).await?;

                let now = Utc::now();
                ctx.db
                    .set_last_nomination(&nominator.address(), now)
                    .await?;
                ctx.db
                    .set_current_targets(&nominator.address(), tx.targets.clone())
                    .await?;
                for target in &tx.targets {
                    ctx.db.set_nominated_at(target, now).await?;
                }

                info!(
                    controller = %tx.controller,
                    targets = tx.targets.len(),
                    "Delayed nomination executed"
                );
                ctx.notify(&format!(
                    "Executed delayed nomination for {} ({} targets)",
                    tx.controller,
                    tx.targets.len()
                ))
                .await;
            }
            Err(e) => {
                warn!(
                    controller = %tx.controller,
                    error = %e,
                    "Delayed nomination failed, will retry next tick"
                );
            }
        }
    }
    Ok(())
}
