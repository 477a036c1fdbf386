//! Notifier trait definition and shared error types.

use filewatch_core::Alert;

/// Errors that can occur during alert delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("TCP connection attempts exhausted after {attempts} refused attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("TCP connection failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("alert write failed: {0}")]
    Write(#[source] std::io::Error),
}

/// Trait for alert channel implementations.
///
/// A channel receives the whole batch produced by one pass and reports how
/// many alerts it delivered.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a batch of alerts through this channel.
    async fn send(&self, alerts: &[Alert]) -> Result<usize, NotifyError>;

    /// Human-readable name for this channel (e.g., "tcp").
    fn channel_name(&self) -> &str;
}

/// Result of dispatching one pass's alert batch.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: String,
    pub job: usize,
    /// Alerts handed to the channel.
    pub attempted: usize,
    /// Alerts the channel reports as written.
    pub delivered: usize,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl DispatchResult {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}
