//! Atomic file copy

use crate::types::SyncError;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

/// Copy a file using the write-then-rename strategy
///
/// Content is streamed into a temporary `.part` file, synced to disk, and
/// renamed into place, so a crash mid-copy never leaves a truncated backup
/// behind. Mode bits and mtime are carried over from the source.
///
/// # Returns
/// Number of bytes copied.
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::from_io(parent, e))?;
    }

    let part_path = dest.with_extension("part");

    let mut src_file = File::open(src).map_err(|e| SyncError::from_io(src, e))?;
    let mut part_file = File::create(&part_path).map_err(|e| SyncError::from_io(&part_path, e))?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| SyncError::from_io(src, e))?;
        if bytes_read == 0 {
            break; // EOF
        }

        part_file
            .write_all(&buffer[0..bytes_read])
            .map_err(|e| SyncError::from_io(&part_path, e))?;
        total_bytes += bytes_read as u64;
    }

    part_file
        .sync_all()
        .map_err(|e| SyncError::from_io(&part_path, e))?;

    // Drop the handle before rename (required on Windows)
    drop(part_file);

    let src_metadata = fs::metadata(src).map_err(|e| SyncError::from_io(src, e))?;
    fs::set_permissions(&part_path, src_metadata.permissions())
        .map_err(|e| SyncError::from_io(&part_path, e))?;

    let mtime = src_metadata
        .modified()
        .map_err(|e| SyncError::from_io(src, e))?;
    filetime::set_file_mtime(&part_path, filetime::FileTime::from_system_time(mtime))
        .map_err(|e| SyncError::from_io(&part_path, e))?;

    // Atomic on POSIX (single syscall)
    fs::rename(&part_path, dest).map_err(|e| SyncError::from_io(dest, e))?;

    Ok(total_bytes)
}
