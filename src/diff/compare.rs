//! Sync decision logic

use crate::hash::fingerprint_file;
use crate::types::SyncError;
use std::path::Path;

/// What the executor should do for one candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Backup copy is missing; copy the source file
    CopyNew,

    /// Backup exists but content differs; version it, then replace
    Replace,

    /// Fingerprints match; nothing to do
    UpToDate,
}

/// Decide whether synchronization is required for a source/backup pair
///
/// Returns `true` when the backup is missing or its fingerprint differs from
/// the source. Pure over two fingerprint computations; neither file is
/// mutated.
///
/// # Errors
/// * `NotFound` - the source file is missing (the enumerator should never
///   have listed it, but the path may vanish mid-run)
/// * `InvalidArgument` - source or backup exists but is not a regular file
/// * `OperationFailed` - a read failed
pub fn should_sync(source: &Path, backup: &Path) -> Result<bool, SyncError> {
    Ok(decide(source, backup)? != SyncDecision::UpToDate)
}

/// Full decision for a source/backup pair
///
/// Splits the `should_sync` predicate's `true` case by backup existence so
/// the executor can pick the right transition without re-checking.
pub fn decide(source: &Path, backup: &Path) -> Result<SyncDecision, SyncError> {
    // Existence of the backup is inherently time-of-use; check it fresh.
    match std::fs::symlink_metadata(backup) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Still fingerprint the source so a vanished or unreadable
            // source surfaces here and not during the copy.
            fingerprint_file(source)?;
            return Ok(SyncDecision::CopyNew);
        }
        Err(e) => return Err(SyncError::from_io(backup, e)),
        Ok(metadata) if !metadata.is_file() => {
            return Err(SyncError::InvalidArgument(format!(
                "backup path is not a regular file: {}",
                backup.display()
            )));
        }
        Ok(_) => {}
    }

    let source_fp = fingerprint_file(source)?;
    let backup_fp = fingerprint_file(backup)?;

    if source_fp == backup_fp {
        Ok(SyncDecision::UpToDate)
    } else {
        Ok(SyncDecision::Replace)
    }
}
