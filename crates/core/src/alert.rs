//! Alerts produced by a change-detection pass.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;

/// What was observed for a single baseline file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertKind {
    /// The file could not be stat'ed (removed or no longer accessible).
    Deletion { error: String },
    /// The live modification time differs from the baseline.
    Modification {
        previous: DateTime<Local>,
        current: DateTime<Local>,
    },
}

/// One detected condition for one file, tagged with the job that saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub job: usize,
    pub path: PathBuf,
    #[serde(flatten)]
    pub kind: AlertKind,
}

impl Alert {
    pub fn deletion(job: usize, path: PathBuf, error: &io::Error) -> Self {
        Self {
            job,
            path,
            kind: AlertKind::Deletion {
                error: error.to_string(),
            },
        }
    }

    pub fn modification(
        job: usize,
        path: PathBuf,
        previous: SystemTime,
        current: SystemTime,
    ) -> Self {
        Self {
            job,
            path,
            kind: AlertKind::Modification {
                previous: previous.into(),
                current: current.into(),
            },
        }
    }

    pub fn is_deletion(&self) -> bool {
        matches!(self.kind, AlertKind::Deletion { .. })
    }

    pub fn is_modification(&self) -> bool {
        matches!(self.kind, AlertKind::Modification { .. })
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AlertKind::Deletion { error } => write!(
                f,
                "job[{}]: file deletion: file={} error={}",
                self.job,
                self.path.display(),
                error
            ),
            AlertKind::Modification { previous, current } => write!(
                f,
                "job[{}]: mtime change: file={} mtime1={} mtime0={}",
                self.job,
                self.path.display(),
                current.to_rfc3339_opts(SecondsFormat::Nanos, true),
                previous.to_rfc3339_opts(SecondsFormat::Nanos, true)
            ),
        }
    }
}
