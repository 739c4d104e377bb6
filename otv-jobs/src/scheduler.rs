//! Cron Scheduler
//!
//! Drives a fixed set of named jobs on cron schedules, evaluated in
//! wall-clock UTC. Each job carries a non-reentrancy latch: a tick
//! that fires while the previous invocation of the same job is still
//! running is dropped silently, never queued. Distinct jobs overlap
//! freely. A failing or panicking body releases its latch and never
//! takes the scheduler down.

use chrono::Utc;
use cron::Schedule;
use futures::future::BoxFuture;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::{JobError, JobResult};

/// A job body: an async closure run on every accepted tick
pub type JobBody = Arc<dyn Fn() -> BoxFuture<'static, JobResult<()>> + Send + Sync>;

/// A named periodic job
pub struct JobDefinition {
    pub name: String,
    pub cron: String,
    pub body: JobBody,
    /// When true, overlapping invocations are allowed
    pub reentrant: bool,
}

impl JobDefinition {
    pub fn new(name: impl Into<String>, cron: impl Into<String>, body: JobBody) -> Self {
        Self {
            name: name.into(),
            cron: cron.into(),
            body,
            reentrant: false,
        }
    }

    pub fn reentrant(mut self) -> Self {
        self.reentrant = true;
        self
    }
}

/// Parse a cron expression, accepting both the standard 5-field form
/// and the seconds-bearing 6-field form
pub fn parse_cron(job: &str, expr: &str) -> JobResult<Schedule> {
    let normalized = if expr.split_whitespace().count() == 5 {
        format!("0 {expr}")
    } else {
        expr.to_string()
    };
    Schedule::from_str(&normalized).map_err(|e| JobError::InvalidCron {
        job: job.to_string(),
        reason: e.to_string(),
    })
}

struct RegisteredJob {
    name: String,
    schedule: Schedule,
    body: JobBody,
    reentrant: bool,
    running: Arc<AtomicBool>,
}

/// The scheduler; register jobs, then start dispatch
#[derive(Default)]
pub struct Scheduler {
    jobs: Vec<RegisteredJob>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job; the cron expression is validated here
    pub fn register(&mut self, definition: JobDefinition) -> JobResult<()> {
        let schedule = parse_cron(&definition.name, &definition.cron)?;
        info!(job = %definition.name, cron = %definition.cron, "Job registered");
        self.jobs.push(RegisteredJob {
            name: definition.name,
            schedule,
            body: definition.body,
            reentrant: definition.reentrant,
            running: Arc::new(AtomicBool::new(false)),
        });
        Ok(())
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Begin dispatch; one loop per job
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut handles = Vec::with_capacity(self.jobs.len());

        for job in self.jobs {
            handles.push(tokio::spawn(dispatch_loop(job, shutdown_rx.clone())));
        }

        info!(jobs = handles.len(), "Scheduler started");
        SchedulerHandle {
            shutdown: shutdown_tx,
            handles,
        }
    }
}

/// Handle used to stop a started scheduler
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop dispatch and wait for the dispatch loops to drain.
    /// In-flight job bodies finish on their own.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
        info!("Scheduler stopped");
    }
}

/// Clears the non-reentrancy latch on every exit path, including
/// panics inside the body
struct LatchGuard(Option<Arc<AtomicBool>>);

impl Drop for LatchGuard {
    fn drop(&mut self) {
        if let Some(latch) = &self.0 {
            latch.store(false, Ordering::SeqCst);
        }
    }
}

async fn dispatch_loop(job: RegisteredJob, mut shutdown: watch::Receiver<bool>) {
    loop {
        let now = Utc::now();
        let Some(next) = job.schedule.after(&now).next() else {
            debug!(job = %job.name, "Schedule exhausted");
            return;
        };
        let delay = (next - now).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => {
                debug!(job = %job.name, "Dispatch loop shutting down");
                return;
            }
        }

        if !job.reentrant && job.running.swap(true, Ordering::SeqCst) {
            debug!(job = %job.name, "Tick dropped, previous invocation still running");
            continue;
        }

        let latch = (!job.reentrant).then(|| job.running.clone());
        let body = job.body.clone();
        let name = job.name.clone();
        tokio::spawn(async move {
            let _guard = LatchGuard(latch);
            let started = Utc::now();
            let timer = Instant::now();
            info!(job = %name, started = %started, "Job started");
            match body().await {
                Ok(()) => info!(
                    job = %name,
                    elapsed_secs = timer.elapsed().as_secs_f64(),
                    "Job finished"
                ),
                Err(e) => error!(
                    job = %name,
                    error = %e,
                    elapsed_secs = timer.elapsed().as_secs_f64(),
                    "Job failed"
                ),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn noop_body() -> JobBody {
        Arc::new(|| Box::pin(async { Ok(()) }))
    }

    #[test]
    fn test_parse_cron_five_field() {
        // Standard 5-field form gains a seconds column.
        assert!(parse_cron("test", "* * * * *").is_ok());
    }

    #[test]
    fn test_parse_cron_six_field() {
        assert!(parse_cron("test", "0 */15 * * * *").is_ok());
    }

    #[test]
    fn test_parse_cron_rejects_garbage() {
        let err = parse_cron("test", "not a cron").unwrap_err();
        assert!(matches!(err, JobError::InvalidCron { .. }));
    }

    #[test]
    fn test_register_validates_cron() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler
            .register(JobDefinition::new("good", "* * * * * *", noop_body()))
            .is_ok());
        assert!(scheduler
            .register(JobDefinition::new("bad", "nope", noop_body()))
            .is_err());
        assert_eq!(scheduler.job_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_body_releases_latch() {
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();
        let body: JobBody = Arc::new(move || {
            let c = c.clone();
            Box::pin(async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(JobError::InvalidCron {
                    job: "probe".into(),
                    reason: "deliberate".into(),
                })
            })
        });

        let mut scheduler = Scheduler::new();
        scheduler
            .register(JobDefinition::new("probe", "* * * * * *", body))
            .unwrap();
        let handle = scheduler.start();

        // Two ticks despite every body failing.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.stop().await;
        assert!(counter.load(Ordering::SeqCst) >= 2);
    }
}
