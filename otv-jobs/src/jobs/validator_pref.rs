//! Validator Preference Job
//!
//! Refreshes the chain-derived attributes of every candidate:
//! identity, commission, controller, reward destination and bonded
//! amount. Setters write plain field values, so running this twice
//! against unchanged chain state leaves records byte-identical.

use std::sync::Arc;
use tracing::warn;

use otv_core::constants::COMMISSION_SCALE;
use otv_core::types::Candidate;

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    for candidate in ctx.db.get_all_candidates().await? {
        if let Err(e) = refresh_candidate(&ctx, &candidate).await {
            warn!(name = %candidate.name, error = %e, "Failed to refresh preferences, skipping");
        }
    }
    Ok(())
}

async fn refresh_candidate(ctx: &JobContext, candidate: &Candidate) -> JobResult<()> {
    let stash = &candidate.stash;

    if let Some(identity) = ctx.chain.get_formatted_identity(stash).await? {
        ctx.db.set_identity(stash, identity).await?;
    }

    let raw_commission = ctx.chain.get_commission(stash).await?;
    ctx.db
        .set_commission(stash, raw_commission as f64 / COMMISSION_SCALE)
        .await?;

    if let Some(controller) = ctx.chain.get_controller_from_stash(stash).await? {
        ctx.db.set_controller(stash, &controller).await?;
    }

    let destination = ctx.chain.get_reward_destination(stash).await?;
    ctx.db.set_reward_destination(stash, destination).await?;

    let bonded = ctx.chain.get_bonded_amount(stash).await?;
    ctx.db.set_bonded(stash, bonded).await?;

    Ok(())
}
