//! Bounded connection retry.
//!
//! Only `ECONNREFUSED` is retried: the collector is reachable but not yet
//! listening. Any other connect error ends the attempt sequence at once.

use std::future::Future;
use std::io;

use filewatch_core::RetryPolicy;
use tracing::warn;

use crate::traits::NotifyError;

/// Run `connect` until it succeeds, fails with a non-refused error, or the
/// policy's attempt budget is spent. Attempts are separated by
/// `policy.backoff`; there is no pause after the last one.
pub async fn connect_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut connect: F,
) -> Result<T, NotifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..=attempts {
        match connect().await {
            Ok(conn) => return Ok(conn),
            Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                warn!(attempt, max_attempts = attempts, error = %e, "TCP connection refused");
                if attempt < attempts {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
            Err(e) => return Err(NotifyError::Connect(e)),
        }
    }

    Err(NotifyError::RetriesExhausted { attempts })
}
