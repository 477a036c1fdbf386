//! Audit engine error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// Directory traversal failed; no partial inventory is kept.
    #[error("error walking directory {path}: {source}")]
    WalkFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
