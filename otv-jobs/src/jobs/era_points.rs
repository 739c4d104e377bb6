//! Era Points Job
//!
//! Backfills per-era points for the 84 eras before the active one
//! (clamped at era zero) and refreshes the active era last, since its
//! point counts keep changing mid-era. An era whose stored aggregate
//! is already filled is skipped without touching the chain.

use std::sync::Arc;
use tracing::{debug, warn};

use otv_constraints::stats::component_stats;
use otv_core::constants::{ERA_FILL_THRESHOLD, INCLUSION_ERA_WINDOW};
use otv_core::types::TotalEraPoints;

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let active_era = ctx.chain.get_active_era_index().await?;
    let start = active_era.saturating_sub(INCLUSION_ERA_WINDOW);

    for era in start..active_era {
        if let Err(e) = process_era(&ctx, era).await {
            warn!(era, error = %e, "Failed to process era, continuing");
        }
    }

    // The active era is refreshed on every tick.
    if let Err(e) = process_era(&ctx, active_era).await {
        warn!(era = active_era, error = %e, "Failed to refresh active era");
    }
    Ok(())
}

/// Populate one era; returns whether the chain was consulted
async fn process_era(ctx: &JobContext, era: u32) -> JobResult<bool> {
    if let Some(stored) = ctx.db.get_total_era_points(era).await? {
        if stored.total_era_points >= ERA_FILL_THRESHOLD && stored.median.is_some() {
            debug!(era, "Era already filled, skipping");
            return Ok(false);
        }
    }

    let totals = ctx.chain.get_total_era_points(era).await?;
    let values: Vec<f64> = totals
        .validators
        .iter()
        .map(|v| v.era_points as f64)
        .collect();
    let summary = component_stats(&values);

    ctx.db
        .set_total_era_points(TotalEraPoints {
            era,
            total_era_points: totals.total,
            validators_era_points: totals.validators.clone(),
            median: summary.map(|s| s.median as u64),
            average: summary.map(|s| s.average),
            max: summary.map(|s| s.max as u64),
            min: summary.map(|s| s.min as u64),
        })
        .await?;

    for validator in &totals.validators {
        ctx.db
            .set_era_points(era, &validator.address, validator.era_points)
            .await?;
    }
    debug!(era, validators = totals.validators.len(), "Era points stored");
    Ok(true)
}
