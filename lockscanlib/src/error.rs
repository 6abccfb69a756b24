//! Error types for lockscanlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning a tree or writing its report.
///
/// Unreadable subdirectories and malformed manifests are not errors: the
/// scanner logs them and carries on. Only a scan root that cannot be listed
/// aborts a scan.
#[derive(Error, Debug)]
pub enum LockscanError {
    /// Scan root does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// The scan root could not be listed
    #[error("failed to read scan root '{path}': {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the validation report
    #[error("failed to write report '{path}': {source}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to encode the validation report
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
