//! Time-driven expiry of pending requests.
//!
//! Safe to run alongside live traffic and to re-run: every record is moved
//! with its own CAS, so a request that was accepted (or already expired)
//! in the meantime is skipped, and one failing record never stops the rest.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::domains::collaboration::errors::CollaborationError;
use crate::domains::collaboration::events::CollaborationEvent;
use crate::domains::collaboration::models::{CollaborationStatus, RequestPatch};
use crate::domains::collaboration::store::{StaleCursor, StoreError};
use crate::kernel::{notifier, retry_read, ServerDeps};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Stale candidates examined.
    pub scanned: usize,
    /// Moved to `expired` by this run.
    pub expired: usize,
    /// Left the pending set before we got to them.
    pub skipped: usize,
    /// Store errors; logged and left for the next run.
    pub failed: usize,
}

/// Expire every pending request whose last activity predates `now - ttl`.
pub async fn sweep_expired(
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<SweepReport, CollaborationError> {
    let cutoff = now - deps.lifecycle.request_ttl;
    let batch_size = deps.lifecycle.sweep_batch_size.max(1);
    let mut report = SweepReport::default();
    let mut cursor: Option<StaleCursor> = None;

    info!(cutoff = %cutoff, "Starting expiry sweep");

    loop {
        let batch = retry_read(&deps.retry, "find_stale_pending", || {
            deps.requests.find_stale_pending(cutoff, cursor, batch_size)
        })
        .await?;

        let fetched = batch.len() as i64;
        if let Some(last) = batch.last() {
            cursor = Some(StaleCursor::from(last));
        }

        for request in batch {
            report.scanned += 1;
            match deps
                .requests
                .update_status(
                    request.id,
                    CollaborationStatus::Pending,
                    CollaborationStatus::Expired,
                    RequestPatch::default(),
                )
                .await
            {
                Ok(expired) => {
                    report.expired += 1;
                    notifier::dispatch(
                        deps,
                        CollaborationEvent::RequestExpired {
                            request: (&expired).into(),
                        },
                    )
                    .await;
                }
                Err(StoreError::StatusMismatch { .. }) | Err(StoreError::NotFound) => {
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!(request_id = %request.id, error = %e, "Failed to expire request");
                    report.failed += 1;
                }
            }
        }

        // The cursor only moves forward, so failed records are passed over
        // instead of being fetched again.
        if fetched < batch_size {
            break;
        }
    }

    info!(
        scanned = report.scanned,
        expired = report.expired,
        skipped = report.skipped,
        failed = report.failed,
        "Expiry sweep finished"
    );
    Ok(report)
}
