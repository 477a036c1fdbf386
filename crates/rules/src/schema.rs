//! Audit plan types.
//!
//! One [`AuditPlan`] is produced per rule line. Only `presence`, `mtime`,
//! `path` and `prune` drive auditing today; `mode`, `atime`, `ctime` and
//! `hash` are carried through so rule files stay forward compatible.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PRESENCE: i64 = 1;
pub const DEFAULT_MODE: i64 = 0;
pub const DEFAULT_ATIME: i64 = 0;
pub const DEFAULT_CTIME: i64 = 0;
pub const DEFAULT_MTIME: i64 = 1;

// ── Plan kind ───────────────────────────────────────────────────────

/// Directory/file marker from the first rule field.
///
/// Both kinds are audited by walking `path`; a file path walks to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Directory,
    File,
}

impl PlanKind {
    /// Map the leading character of a rule line to a kind.
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'd' => Some(PlanKind::Directory),
            'f' => Some(PlanKind::File),
            _ => None,
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanKind::Directory => write!(f, "directory"),
            PlanKind::File => write!(f, "file"),
        }
    }
}

// ── Audit plan ──────────────────────────────────────────────────────

/// A structured rule: what path to watch and which attributes to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditPlan {
    pub kind: PlanKind,
    /// Expect the path to exist.
    pub presence: i64,
    /// Permission bits policy (e.g. 7555). Not enforced.
    pub mode: i64,
    /// Access-time policy. Not enforced.
    pub atime: i64,
    /// Inode change-time policy. Not enforced.
    pub ctime: i64,
    /// Modification-time policy; `1` enables comparison.
    pub mtime: i64,
    /// Content hash policy (md5, ...). Not enforced.
    pub hash: String,
    /// Root path to audit.
    pub path: PathBuf,
    /// Directory name excluded from the walk at any depth.
    pub prune: String,
}

impl AuditPlan {
    /// A plan for `path` with every policy field at its default.
    pub fn new(kind: PlanKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            presence: DEFAULT_PRESENCE,
            mode: DEFAULT_MODE,
            atime: DEFAULT_ATIME,
            ctime: DEFAULT_CTIME,
            mtime: DEFAULT_MTIME,
            hash: String::new(),
            path: path.into(),
            prune: String::new(),
        }
    }

    pub fn with_prune(mut self, prune: impl Into<String>) -> Self {
        self.prune = prune.into();
        self
    }

    pub fn with_mtime(mut self, mtime: i64) -> Self {
        self.mtime = mtime;
        self
    }

    pub fn mtime_enabled(&self) -> bool {
        self.mtime == 1
    }

    pub fn presence_expected(&self) -> bool {
        self.presence == 1
    }
}
