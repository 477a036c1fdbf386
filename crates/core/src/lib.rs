pub mod alert;
pub mod config;

pub use alert::{Alert, AlertKind};
pub use config::{load_dotenv, AgentConfig, ConfigError, Destination, RetryPolicy};

/// Tool name used in log lines, the syslog header, and `--version`.
pub const TOOL_NAME: &str = "file-notify";
