//! Syslog-style alert framing.
//!
//! Each alert goes on the wire as
//! `<105>RFC3339 hostname tool[pid] alert text`, one write per alert,
//! with no trailing newline or length prefix.

use std::fmt;

use chrono::{Local, SecondsFormat};

use filewatch_core::Alert;

/// `<105>`: facility 13 (log audit), severity 1 (alert).
pub const PRIORITY: u8 = 105;

/// Header shared by every alert line of one dispatch batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyslogHeader {
    pub timestamp: String,
    pub hostname: String,
    pub tool: String,
    pub pid: u32,
}

impl SyslogHeader {
    /// Header stamped with the current local time, host and process.
    pub fn now(tool: &str) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            hostname: hostname(),
            tool: tool.to_string(),
            pid: std::process::id(),
        }
    }

    /// Prefix an alert with this header.
    pub fn frame(&self, alert: &Alert) -> String {
        format!("{self}{alert}")
    }
}

impl fmt::Display for SyslogHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}>{} {} {}[{}] ",
            PRIORITY, self.timestamp, self.hostname, self.tool, self.pid
        )
    }
}

/// Returns the system hostname.
fn hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            #[cfg(unix)]
            {
                use std::process::Command;
                std::fs::read_to_string("/proc/sys/kernel/hostname")
                    .ok()
                    .or_else(|| {
                        Command::new("hostname")
                            .output()
                            .ok()
                            .and_then(|o| String::from_utf8(o.stdout).ok())
                    })
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "unknown".to_string())
            }
            #[cfg(not(unix))]
            {
                "unknown".to_string()
            }
        })
}
