//! Error types for the rule loader.

use std::path::PathBuf;

/// Errors that can occur while loading a rule file.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule file could not be opened or read.
    #[error("failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
