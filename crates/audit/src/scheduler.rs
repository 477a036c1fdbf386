//! Per-job audit scheduling.
//!
//! Every job runs in its own task: it sleeps a startup offset of
//! `index * stagger`, then runs a pass each time its periodic timer fires.
//! Passes of one job never overlap; a slow pass delays the next one and
//! missed ticks are skipped. Jobs share nothing but the log sink.
//!
//! Tasks stop when their cancellation token fires. Cancellation is observed
//! while waiting, never in the middle of a pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use filewatch_core::{AgentConfig, Alert};
use filewatch_notify::Dispatcher;

use crate::detector::detect;
use crate::job::AuditJob;

/// Timing knobs shared by every job task.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub poll_interval: Duration,
    pub stagger: Duration,
    /// Emit per-job diagnostics (watched path, startup offset).
    pub debug: bool,
}

impl From<&AgentConfig> for SchedulerSettings {
    fn from(config: &AgentConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            stagger: config.stagger,
            debug: config.debug,
        }
    }
}

/// Delay before job `index` starts its timer.
pub fn startup_offset(index: usize, stagger: Duration) -> Duration {
    stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Outcome of a single pass.
#[derive(Debug)]
pub struct PassReport {
    pub job: usize,
    pub alerts: Vec<Alert>,
    pub delivered: usize,
}

/// Detect changes for `job` and hand the alerts to the dispatcher.
pub async fn run_pass(job: &AuditJob, index: usize, dispatcher: &Dispatcher) -> PassReport {
    let alerts = detect(job, index);
    let result = dispatcher.dispatch(index, &alerts).await;
    PassReport {
        job: index,
        alerts,
        delivered: result.delivered,
    }
}

/// Drive one job until `cancel` fires.
pub async fn run_job(
    job: AuditJob,
    index: usize,
    settings: SchedulerSettings,
    dispatcher: Arc<Dispatcher>,
    cancel: CancellationToken,
) {
    let offset = startup_offset(index, settings.stagger);
    if settings.debug {
        info!(job = index, path = %job.plan().path.display(), "watching directory");
        info!(job = index, offset = ?offset, "startup offset");
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!(job = index, "cancelled before first pass");
            return;
        }
        _ = tokio::time::sleep(offset) => {}
    }
    info!(job = index, "entering audit loop");

    // First pass fires one full interval after the offset.
    let mut ticker =
        tokio::time::interval_at(Instant::now() + settings.poll_interval, settings.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                run_pass(&job, index, &dispatcher).await;
            }
        }
    }

    info!(job = index, "audit loop stopped");
}

/// Launches and tracks one task per job.
pub struct AuditScheduler {
    settings: SchedulerSettings,
    dispatcher: Arc<Dispatcher>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl AuditScheduler {
    pub fn new(settings: SchedulerSettings, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            settings,
            dispatcher,
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Spawn a task for every job; returns how many were started.
    ///
    /// Each task is registered with the tracker before it runs, and the
    /// tracker is closed afterwards so [`wait`](Self::wait) covers them all.
    pub fn spawn_all(&self, jobs: Vec<AuditJob>) -> usize {
        let mut started = 0;
        for (index, job) in jobs.into_iter().enumerate() {
            self.tracker.spawn(run_job(
                job,
                index,
                self.settings.clone(),
                Arc::clone(&self.dispatcher),
                self.cancel.child_token(),
            ));
            started += 1;
        }
        self.tracker.close();
        info!(jobs = started, "audit jobs started");
        started
    }

    /// Number of job tasks still running.
    pub fn running(&self) -> usize {
        self.tracker.len()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Ask every job task to stop.
    pub fn shutdown(&self) {
        info!("audit scheduler shutdown requested");
        self.cancel.cancel();
    }

    /// Wait until every started task has finished.
    pub async fn wait(&self) {
        self.tracker.wait().await;
    }
}
