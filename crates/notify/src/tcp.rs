//! TCP syslog notifier.
//!
//! Opens one connection per batch, writes every framed alert, then closes
//! the connection. Nothing is held open between passes.

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, warn};

use filewatch_core::{Alert, Destination, RetryPolicy};

use crate::retry::connect_with_retry;
use crate::syslog::SyslogHeader;
use crate::traits::{Notifier, NotifyError};

/// Delivers alert batches to a remote collector over TCP.
#[derive(Debug, Clone)]
pub struct TcpNotifier {
    destination: Destination,
    retry: RetryPolicy,
    tool: String,
}

impl TcpNotifier {
    pub fn new(destination: Destination, retry: RetryPolicy, tool: impl Into<String>) -> Self {
        Self {
            destination,
            retry,
            tool: tool.into(),
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }
}

#[async_trait::async_trait]
impl Notifier for TcpNotifier {
    /// Write each alert as its own framed line.
    ///
    /// A failed write is logged and the remaining alerts are still attempted.
    async fn send(&self, alerts: &[Alert]) -> Result<usize, NotifyError> {
        let header = SyslogHeader::now(&self.tool);
        let host = self.destination.host.as_str();
        let port = self.destination.port;

        let mut stream =
            connect_with_retry(&self.retry, || TcpStream::connect((host, port))).await?;
        debug!(destination = %self.destination, "connected to collector");

        let mut delivered = 0;
        for alert in alerts {
            let line = header.frame(alert);
            match stream.write_all(line.as_bytes()).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    let e = NotifyError::Write(e);
                    warn!(destination = %self.destination, path = %alert.path.display(), error = %e, "failed to write alert");
                }
            }
        }

        if let Err(e) = stream.shutdown().await {
            debug!(destination = %self.destination, error = %e, "collector connection shutdown failed");
        }

        Ok(delivered)
    }

    fn channel_name(&self) -> &str {
        "tcp"
    }
}
