//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler
//!     │
//!     ├─► sweep_expired(now)            (cron, hourly by default)
//!     │       └─► per-record CAS pending → expired, RequestExpired notifications
//!     │
//!     └─► StreamHub::cleanup()          (every 10 minutes)
//!             └─► drop topics whose SSE subscribers have all disconnected
//! ```

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::collaboration::actions::sweep_expired;
use crate::kernel::ServerDeps;

const STREAM_CLEANUP_CRON: &str = "0 */10 * * * *";

/// Start all scheduled tasks
pub async fn start_scheduler(deps: Arc<ServerDeps>, sweep_cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sweep_deps = deps.clone();
    let sweep_job = Job::new_async(sweep_cron, move |_uuid, _lock| {
        let deps = sweep_deps.clone();
        Box::pin(async move {
            run_expiry_sweep(&deps).await;
        })
    })?;

    scheduler.add(sweep_job).await?;

    let cleanup_deps = deps.clone();
    let cleanup_job = Job::new_async(STREAM_CLEANUP_CRON, move |_uuid, _lock| {
        let deps = cleanup_deps.clone();
        Box::pin(async move {
            run_stream_cleanup(&deps).await;
        })
    })?;

    scheduler.add(cleanup_job).await?;
    scheduler.start().await?;

    tracing::info!(
        cron = %sweep_cron,
        "Scheduled tasks started (expiry sweep, stream cleanup)"
    );
    Ok(scheduler)
}

/// Run one expiry sweep. The sweep logs its own report; only a failure to
/// scan is surfaced here.
pub async fn run_expiry_sweep(deps: &ServerDeps) {
    tracing::debug!("Running scheduled expiry sweep");
    if let Err(e) = sweep_expired(Utc::now(), deps).await {
        tracing::error!(error = %e, "Scheduled expiry sweep failed");
    }
}

/// Drop stream topics nobody is subscribed to any more.
pub async fn run_stream_cleanup(deps: &ServerDeps) -> usize {
    let removed = deps.stream_hub.cleanup().await;
    if removed > 0 {
        tracing::debug!(removed, "Dropped idle stream topics");
    }
    removed
}
