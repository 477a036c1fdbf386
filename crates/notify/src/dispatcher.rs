//! Routes a pass's alerts to the configured channel.
//!
//! The dispatcher is best-effort: channel failures are logged and reported
//! in the [`DispatchResult`], never propagated. A batch that cannot be
//! delivered is dropped; nothing is queued for the next pass.

use std::time::Instant;

use filewatch_core::Alert;

use crate::traits::{DispatchResult, Notifier};

/// Delivers alert batches through a single notifier channel.
pub struct Dispatcher {
    channel: Box<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(channel: Box<dyn Notifier>) -> Self {
        Self { channel }
    }

    /// Dispatch the alerts of one pass for `job`.
    ///
    /// An empty batch never reaches the channel.
    pub async fn dispatch(&self, job: usize, alerts: &[Alert]) -> DispatchResult {
        let channel = self.channel.channel_name().to_string();

        if alerts.is_empty() {
            tracing::debug!(job, "no alerts to dispatch");
            return DispatchResult {
                channel,
                job,
                attempted: 0,
                delivered: 0,
                error: None,
                duration_ms: 0,
            };
        }

        let start = Instant::now();
        let result = self.channel.send(alerts).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let (delivered, error) = match result {
            Ok(delivered) => {
                tracing::info!(
                    job,
                    channel = %channel,
                    attempted = alerts.len(),
                    delivered,
                    duration_ms,
                    "alerts dispatched"
                );
                (delivered, None)
            }
            Err(e) => {
                tracing::warn!(
                    job,
                    channel = %channel,
                    attempted = alerts.len(),
                    error = %e,
                    duration_ms,
                    "alert dispatch failed, batch dropped"
                );
                (0, Some(e.to_string()))
            }
        };

        DispatchResult {
            channel,
            job,
            attempted: alerts.len(),
            delivered,
            error,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::traits::NotifyError;

    struct MockNotifier {
        send_count: Arc<AtomicUsize>,
        should_fail: bool,
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, alerts: &[Alert]) -> Result<usize, NotifyError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(NotifyError::RetriesExhausted { attempts: 2 })
            } else {
                Ok(alerts.len())
            }
        }

        fn channel_name(&self) -> &str {
            "mock"
        }
    }

    fn alerts(n: usize) -> Vec<Alert> {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        (0..n)
            .map(|i| Alert::deletion(0, PathBuf::from(format!("/tmp/f{i}")), &err))
            .collect()
    }

    #[tokio::test]
    async fn dispatch_delivers_batch() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(Box::new(MockNotifier {
            send_count: count.clone(),
            should_fail: false,
        }));

        let result = dispatcher.dispatch(4, &alerts(3)).await;
        assert!(result.success());
        assert_eq!(result.job, 4);
        assert_eq!(result.attempted, 3);
        assert_eq!(result.delivered, 3);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_batch_skips_channel() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(Box::new(MockNotifier {
            send_count: count.clone(),
            should_fail: false,
        }));

        let result = dispatcher.dispatch(0, &[]).await;
        assert!(result.success());
        assert_eq!(result.delivered, 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn channel_failure_is_reported_not_raised() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(Box::new(MockNotifier {
            send_count: count.clone(),
            should_fail: true,
        }));

        let result = dispatcher.dispatch(1, &alerts(2)).await;
        assert!(!result.success());
        assert_eq!(result.attempted, 2);
        assert_eq!(result.delivered, 0);
        assert!(result.error.unwrap().contains("exhausted"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
