//! Bounded retries for store reads.
//!
//! Only `StoreError::Unavailable` is retried. Writes never go through here:
//! a CAS or insert that may have committed must not be replayed blindly.

use std::future::Future;
use tracing::warn;

use crate::config::RetryPolicy;
use crate::domains::collaboration::store::StoreError;

pub async fn retry_read<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let attempts = policy.attempts.max(1);
    let mut retry = 0;
    loop {
        match op().await {
            Err(StoreError::Unavailable(reason)) if retry + 1 < attempts => {
                let delay = policy.delay_for(retry);
                warn!(
                    operation = operation,
                    attempt = retry + 1,
                    delay_ms = delay.as_millis() as u64,
                    reason = %reason,
                    "Store read unavailable, retrying"
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            other => return other,
        }
    }
}
