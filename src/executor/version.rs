//! Versioned relocation of stale backup files
//!
//! A backup file about to be overwritten is moved (never duplicated) into the
//! versioning directory under `<stem>_<timestamp><ext>`. A manifest in the
//! versioning directory is updated per snapshot for audit/recovery.

use crate::executor::copy::copy_file_atomic;
use crate::types::SyncError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Timestamp format used in versioned file names (local time, second precision)
const VERSION_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// One versioned snapshot recorded in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedSnapshot {
    /// Original file name in the backup directory
    pub original_name: String,
    /// File name inside the versioning directory
    pub versioned_name: String,
    /// ISO 8601 timestamp of when the snapshot was taken
    pub versioned_at: String,
    /// File size in bytes
    pub size: u64,
}

/// Manifest that accumulates all snapshots in a versioning directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionManifest {
    /// Snapshots in versioning order
    pub snapshots: Vec<VersionedSnapshot>,
}

impl VersionManifest {
    /// Create a new empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot entry
    pub fn add_snapshot(&mut self, snapshot: VersionedSnapshot) {
        self.snapshots.push(snapshot);
    }
}

/// Format a moment as a version-name timestamp
pub fn version_timestamp(moment: DateTime<Local>) -> String {
    moment.format(VERSION_TIMESTAMP_FORMAT).to_string()
}

/// Build the versioned name `<stem>_<timestamp><ext>` for an original name
pub fn versioned_file_name(original: &str, timestamp: &str) -> String {
    match original.rfind('.') {
        Some(dot) => format!("{}_{}{}", &original[..dot], timestamp, &original[dot..]),
        None => format!("{}_{}", original, timestamp),
    }
}

/// Pick a versioned path that does not collide with an existing snapshot
///
/// Two versioning events for the same original name in the same second would
/// produce the same timestamped name. Rather than overwriting the earlier
/// snapshot or failing, a monotonic counter is appended before the extension
/// (`c_20231001T123456_1.txt`, `_2`, ...). This deliberately diverges from
/// designs that leave the collision unhandled.
pub fn unique_versioned_path(versioning_dir: &Path, original: &str, timestamp: &str) -> PathBuf {
    let base_name = versioned_file_name(original, timestamp);
    let base_path = versioning_dir.join(&base_name);
    if !base_path.exists() {
        return base_path;
    }

    let mut counter = 1u32;
    loop {
        let name = versioned_file_name(original, &format!("{}_{}", timestamp, counter));
        let path = versioning_dir.join(name);
        if !path.exists() {
            return path;
        }
        counter += 1;
    }
}

/// Move a stale backup file into the versioning directory
///
/// The file is relocated with `rename`; on cross-device moves it falls back
/// to copy-then-remove. The old content never exists twice in the backup
/// directory. The manifest is updated after a successful move.
///
/// # Returns
/// The versioned path and bare versioned file name.
pub fn move_to_versioning(
    backup_path: &Path,
    versioning_dir: &Path,
    original_name: &str,
) -> Result<(PathBuf, String), SyncError> {
    fs::create_dir_all(versioning_dir).map_err(|e| SyncError::from_io(versioning_dir, e))?;

    let metadata =
        fs::symlink_metadata(backup_path).map_err(|e| SyncError::from_io(backup_path, e))?;
    let size = metadata.len();

    let timestamp = version_timestamp(Local::now());
    let versioned_path = unique_versioned_path(versioning_dir, original_name, &timestamp);
    let versioned_name = versioned_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| versioned_file_name(original_name, &timestamp));

    match fs::rename(backup_path, &versioned_path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            copy_file_atomic(backup_path, &versioned_path)?;
            fs::remove_file(backup_path).map_err(|e| SyncError::from_io(backup_path, e))?;
        }
        Err(e) => return Err(SyncError::from_io(backup_path, e)),
    }

    append_manifest_entry(
        versioning_dir,
        VersionedSnapshot {
            original_name: original_name.to_string(),
            versioned_name: versioned_name.clone(),
            versioned_at: Local::now().to_rfc3339(),
            size,
        },
    )?;

    Ok((versioned_path, versioned_name))
}

// Concurrent workers share one manifest file; serialize the read-modify-write.
static MANIFEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Read-modify-write of `MANIFEST.json`. Not transactional across processes.
fn append_manifest_entry(
    versioning_dir: &Path,
    snapshot: VersionedSnapshot,
) -> Result<(), SyncError> {
    let _guard = MANIFEST_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let manifest_path = versioning_dir.join("MANIFEST.json");

    let mut manifest = if manifest_path.exists() {
        let content = fs::read_to_string(&manifest_path)
            .map_err(|e| SyncError::from_io(&manifest_path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            SyncError::InvalidArgument(format!("failed to parse MANIFEST.json: {}", e))
        })?
    } else {
        VersionManifest::new()
    };

    manifest.add_snapshot(snapshot);

    let json = serde_json::to_string_pretty(&manifest).map_err(|e| {
        SyncError::InvalidArgument(format!("failed to serialize MANIFEST.json: {}", e))
    })?;
    fs::write(&manifest_path, json).map_err(|e| SyncError::from_io(&manifest_path, e))?;

    Ok(())
}
