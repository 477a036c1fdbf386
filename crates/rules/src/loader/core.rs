//! Line parsing and file loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::schema::{
    AuditPlan, PlanKind, DEFAULT_ATIME, DEFAULT_CTIME, DEFAULT_MODE, DEFAULT_MTIME,
    DEFAULT_PRESENCE,
};

use super::error::{Result, RuleError};

const FIELD_SEPARATOR: char = '\t';

/// Parse a single rule line.
///
/// Returns `None` for blank lines, comments, and lines whose first character
/// is not a `d`/`f` kind marker. Any numeric field that fails to parse falls
/// back to its default; missing trailing fields are read as empty.
pub fn parse_line(line: &str) -> Option<AuditPlan> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let kind = PlanKind::from_marker(line.chars().next()?)?;

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let text = |idx: usize| fields.get(idx).copied().unwrap_or("");
    let int = |idx: usize, default: i64| text(idx).parse::<i64>().unwrap_or(default);

    Some(AuditPlan {
        kind,
        presence: int(1, DEFAULT_PRESENCE),
        mode: int(2, DEFAULT_MODE),
        atime: int(3, DEFAULT_ATIME),
        ctime: int(4, DEFAULT_CTIME),
        mtime: int(5, DEFAULT_MTIME),
        hash: text(6).to_string(),
        path: PathBuf::from(text(7)),
        prune: text(8).to_string(),
    })
}

/// Parse every rule line in `contents`, preserving file order.
pub fn parse_rules(contents: &str) -> Vec<AuditPlan> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let plan = parse_line(line);
            if plan.is_none() && !line.trim().is_empty() {
                debug!(line = idx + 1, "ignoring non-rule line");
            }
            plan
        })
        .collect()
}

/// Read and parse a rule file.
pub fn load_rules(path: &Path) -> Result<Vec<AuditPlan>> {
    let contents = fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let plans = parse_rules(&contents);
    info!(path = %path.display(), "audit plans loaded: {}", plans.len());
    Ok(plans)
}
