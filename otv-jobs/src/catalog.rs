//! Catalog Registration
//!
//! Wires every job of the catalog into a scheduler with its effective
//! cron expression (per-job override or default table). The scheduler
//! does not order jobs; ordering between producers and consumers is
//! expressed through the relative pacing of the default schedules,
//! and every job tolerates stale inputs.

use std::future::Future;
use std::sync::Arc;

use crate::context::JobContext;
use crate::error::JobResult;
use crate::jobs;
use crate::scheduler::{JobBody, JobDefinition, Scheduler};

fn make_body<F, Fut>(ctx: Arc<JobContext>, f: F) -> JobBody
where
    F: Fn(Arc<JobContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = JobResult<()>> + Send + 'static,
{
    Arc::new(move || Box::pin(f(ctx.clone())))
}

/// Register the full job catalog
pub fn register_all(scheduler: &mut Scheduler, ctx: Arc<JobContext>) -> JobResult<()> {
    let cron = ctx.config.cron.clone();

    scheduler.register(JobDefinition::new(
        "Monitor",
        cron.monitor(),
        make_body(ctx.clone(), jobs::monitor::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "ClearOffline",
        cron.clear_offline(),
        make_body(ctx.clone(), jobs::clear_offline::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "EraPoints",
        cron.era_points(),
        make_body(ctx.clone(), jobs::era_points::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "ActiveValidator",
        cron.active_validator(),
        make_body(ctx.clone(), jobs::active_validator::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "Inclusion",
        cron.inclusion(),
        make_body(ctx.clone(), jobs::inclusion::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "SessionKey",
        cron.session_key(),
        make_body(ctx.clone(), jobs::session_key::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "UnclaimedEras",
        cron.unclaimed_eras(),
        make_body(ctx.clone(), jobs::unclaimed_eras::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "ValidatorPref",
        cron.validator_pref(),
        make_body(ctx.clone(), jobs::validator_pref::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "Validity",
        cron.validity(),
        make_body(ctx.clone(), jobs::validity::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "Score",
        cron.score(),
        make_body(ctx.clone(), jobs::score::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "EraStats",
        cron.era_stats(),
        make_body(ctx.clone(), jobs::era_stats::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "ExtNominations",
        cron.ext_nominations(),
        make_body(ctx.clone(), jobs::ext_nominations::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "Execution",
        cron.execution(),
        make_body(ctx.clone(), jobs::execution::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "RewardClaim",
        cron.reward_claiming(),
        make_body(ctx.clone(), jobs::reward_claim::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "Cancel",
        cron.cancel(),
        make_body(ctx.clone(), jobs::cancel::run),
    ))?;
    scheduler.register(JobDefinition::new(
        "Stale",
        cron.stale(),
        make_body(ctx, jobs::stale::run),
    ))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;

    #[tokio::test]
    async fn test_register_all_accepts_default_config() {
        let ctx = testkit::context().build();
        let mut scheduler = Scheduler::new();
        register_all(&mut scheduler, ctx).unwrap();
        assert_eq!(scheduler.job_count(), 16);
    }
}
