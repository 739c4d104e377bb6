//! Reward Claim Job
//!
//! Batches one claim for every (era, stash) pair older than the
//! network's claim threshold across all candidates' unclaimed eras.
//! Skips entirely (with a notification) when the claimer account is
//! too low on funds to pay fees.

use std::sync::Arc;
use tracing::{debug, info};

use otv_chain::EraReward;

use crate::context::JobContext;
use crate::error::JobResult;

/// Minimum claimer free balance, in the smallest chain unit
const MIN_FREE_BALANCE: u128 = 1_000_000_000_000;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let Some(claimer) = &ctx.claimer else {
        debug!("No claimer configured, skipping");
        return Ok(());
    };

    let balance = ctx.chain.get_balance(&claimer.address()).await?;
    if balance < MIN_FREE_BALANCE {
        ctx.notify(&format!(
            "Reward claimer {} balance too low to claim ({} < {})",
            claimer.address(),
            balance,
            MIN_FREE_BALANCE
        ))
        .await;
        return Ok(());
    }

    let current_era = ctx.chain.get_current_era().await?;
    let threshold = ctx.config.global.network().reward_claim_threshold();
    let cutoff = current_era.saturating_sub(threshold);

    let mut rewards = Vec::new();
    for candidate in ctx.db.get_all_candidates().await? {
        for era in &candidate.unclaimed_eras {
            if *era < cutoff {
                rewards.push(EraReward {
                    era: *era,
                    stash: candidate.stash.clone(),
                });
            }
        }
    }

    if rewards.is_empty() {
        debug!("No rewards old enough to claim");
        return Ok(());
    }

    let count = rewards.len();
    claimer.claim(&rewards).await?;
    info!(count, "Batched reward claim submitted");
    ctx.notify(&format!("Claimed rewards for {count} era/stash pairs"))
        .await;
    Ok(())
}
