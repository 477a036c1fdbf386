//! Baseline inventory builder.
//!
//! Walks a rule's root path and records `{path, mtime}` for every file.
//! Directories named like the rule's `prune` entry are not descended into.
//! Symlinks are recorded as links (not followed), matching how the
//! detector re-stats them.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing::info;
use walkdir::{DirEntry, WalkDir};

use filewatch_rules::AuditPlan;

use crate::error::AuditError;

/// Baseline attributes of one file, captured when the job is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    pub path: PathBuf,
    pub mtime: SystemTime,
}

/// Walk `plan.path` and snapshot every file, in walk order.
///
/// Any traversal error other than a pruned subtree fails the whole build.
pub fn build_inventory(plan: &AuditPlan) -> Result<Vec<FileSnapshot>, AuditError> {
    let prune = plan.prune.as_str();
    let mut inventory = Vec::new();

    let walker = WalkDir::new(&plan.path).into_iter().filter_entry(|entry| {
        if is_pruned(entry, prune) {
            info!(path = %entry.path().display(), "skip");
            return false;
        }
        true
    });

    for entry in walker {
        let entry = entry.map_err(|e| walk_failure(&plan.path, e))?;
        let file_type = entry.file_type();
        if !(file_type.is_file() || file_type.is_symlink()) {
            continue;
        }

        let mtime = entry
            .metadata()
            .map_err(|e| walk_failure(&plan.path, e))?
            .modified()
            .map_err(|source| AuditError::WalkFailure {
                path: entry.path().to_path_buf(),
                source,
            })?;

        info!(
            mtime = %DateTime::<Local>::from(mtime).to_rfc3339(),
            file = %entry.path().display(),
            "add"
        );
        inventory.push(FileSnapshot {
            path: entry.into_path(),
            mtime,
        });
    }

    Ok(inventory)
}

fn is_pruned(entry: &DirEntry, prune: &str) -> bool {
    !prune.is_empty() && entry.file_type().is_dir() && entry.file_name() == OsStr::new(prune)
}

fn walk_failure(root: &Path, err: walkdir::Error) -> AuditError {
    let path = err.path().unwrap_or(root).to_path_buf();
    AuditError::WalkFailure {
        path,
        source: io::Error::from(err),
    }
}
