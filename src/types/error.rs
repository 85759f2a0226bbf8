//! Error types for txtsync

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error taxonomy for txtsync operations
///
/// Configuration errors are fatal to the whole run and surfaced before any
/// file is touched. All other variants are caught at per-file granularity by
/// the executor and recorded as `Failed` outcomes.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An expected path is absent
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// A path exists but has the wrong kind, or an input contradicts itself
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An underlying I/O operation failed (permissions, disk full, transient OS error)
    #[error("operation failed on {path}: {source}")]
    OperationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid configuration (fatal, nothing was synced)
    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Classify an I/O error against the path it occurred on.
    ///
    /// `NotFound` is split out so callers can distinguish a vanished path
    /// from a genuine operation failure.
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => SyncError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SyncError::OperationFailed {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Check if this error means a path was absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound { .. })
    }

    /// Check if this error is a configuration or argument-validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SyncError::InvalidArgument(_) | SyncError::Config(_))
    }

    /// Check if this error wraps a failed I/O operation
    pub fn is_operation_failure(&self) -> bool {
        matches!(self, SyncError::OperationFailed { .. })
    }
}
