//! Alert delivery for the file audit agent.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable alert channels
//! - Syslog-style framing of alert lines
//! - TCP notifier with bounded retry on refused connections
//! - Dispatcher that delivers a pass's alert batch and logs the outcome

pub mod dispatcher;
pub mod retry;
pub mod syslog;
pub mod tcp;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use syslog::SyslogHeader;
pub use tcp::TcpNotifier;
pub use traits::{DispatchResult, Notifier, NotifyError};
