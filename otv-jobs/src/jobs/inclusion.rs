//! Inclusion Rate Job
//!
//! Derives each candidate's inclusion rate (fraction of the last 84
//! prior eras it earned points in) and span inclusion rate (same over
//! the last 28) from the stored era points rows. Reads only the
//! store, so it converges once the era points job has backfilled.

use std::sync::Arc;
use tracing::debug;

use otv_core::constants::{INCLUSION_ERA_WINDOW, SPAN_INCLUSION_ERA_WINDOW};

use crate::context::JobContext;
use crate::error::JobResult;

pub async fn run(ctx: Arc<JobContext>) -> JobResult<()> {
    let active_era = ctx.chain.get_active_era_index().await?;
    let last_finished = active_era.saturating_sub(1);
    let from = active_era.saturating_sub(INCLUSION_ERA_WINDOW);
    let span_from = active_era.saturating_sub(SPAN_INCLUSION_ERA_WINDOW);

    for candidate in ctx.db.get_all_candidates().await? {
        let rows = ctx
            .db
            .get_era_points_range(&candidate.stash, from, last_finished)
            .await?;

        let earned = rows.iter().filter(|r| r.era_points > 0).count();
        let span_earned = rows
            .iter()
            .filter(|r| r.era >= span_from && r.era_points > 0)
            .count();

        let inclusion = earned as f64 / INCLUSION_ERA_WINDOW as f64;
        let span_inclusion = span_earned as f64 / SPAN_INCLUSION_ERA_WINDOW as f64;
        ctx.db
            .set_inclusion(&candidate.stash, inclusion, span_inclusion)
            .await?;
        debug!(name = %candidate.name, inclusion, span_inclusion, "Inclusion updated");
    }
    Ok(())
}
