use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Rejected configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("poll interval must be at least one minute")]
    ZeroPollInterval,

    #[error("retry attempts must be at least 1")]
    ZeroRetryAttempts,

    #[error("destination host must not be empty")]
    EmptyHost,
}

// ── Top-level config ──────────────────────────────────────────

/// Effective agent configuration, built once at startup and handed to
/// every component. Nothing in the agent mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub destination: Destination,
    /// Period between two passes of the same job.
    pub poll_interval: Duration,
    /// Per-job startup offset unit: job `n` waits `n * stagger` before its timer starts.
    pub stagger: Duration,
    pub retry: RetryPolicy,
    pub debug: bool,
    pub rules_path: PathBuf,
    pub log_path: PathBuf,
}

impl AgentConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroRetryAttempts);
        }
        if self.destination.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        Ok(self)
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("poll: {}m", self.poll_interval.as_secs() / 60);
        tracing::info!("  destination: {}", self.destination);
        tracing::info!("  rules:       {}", self.rules_path.display());
        tracing::info!("  log:         {}", self.log_path.display());
        tracing::info!("  stagger:     {}s", self.stagger.as_secs());
        tracing::info!(
            "  retry:       attempts={}, backoff={}s",
            self.retry.max_attempts,
            self.retry.backoff.as_secs()
        );
    }
}

// ── Destination ───────────────────────────────────────────────

/// Remote collector endpoint that receives alert batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub host: String,
    pub port: u16,
}

impl Destination {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

// ── Retry ─────────────────────────────────────────────────────

/// Bounded retry for collector connections refused by the peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total connection attempts, including the first one.
    pub max_attempts: u32,
    /// Pause between two consecutive attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_secs(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AgentConfig {
        AgentConfig {
            destination: Destination::new("127.0.0.1", 6000),
            poll_interval: Duration::from_secs(60),
            stagger: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            debug: false,
            rules_path: PathBuf::from("file-watch.rules"),
            log_path: PathBuf::from("file-watch.log"),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let mut config = sample();
        config.poll_interval = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPollInterval)));
    }

    #[test]
    fn zero_retry_attempts_rejected() {
        let mut config = sample();
        config.retry.max_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroRetryAttempts)));
    }

    #[test]
    fn destination_display_brackets_ipv6() {
        assert_eq!(Destination::new("10.0.0.1", 514).to_string(), "10.0.0.1:514");
        assert_eq!(Destination::new("::1", 514).to_string(), "[::1]:514");
    }

    #[test]
    fn default_retry_matches_agent_defaults() {
        let retry = RetryPolicy::default();
        assert_eq!(retry.max_attempts, 2);
        assert_eq!(retry.backoff, Duration::from_secs(2));
    }
}
