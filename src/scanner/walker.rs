//! Flat directory enumeration for candidate files

use crate::types::{CandidateFile, SyncError};
use globset::{Glob, GlobMatcher};
use std::fs;
use std::path::Path;

/// Glob for candidate file names. Case-sensitive by design.
const CANDIDATE_GLOB: &str = "*.txt";

fn candidate_matcher() -> Result<GlobMatcher, SyncError> {
    Glob::new(CANDIDATE_GLOB)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| SyncError::Config(format!("invalid candidate pattern: {}", e)))
}

/// Enumerate `.txt` files directly inside `dir`
///
/// Returns one `CandidateFile` per matching regular file, sorted
/// lexicographically by name so dry-run output and tests are reproducible.
/// No recursion into subdirectories.
///
/// # Errors
/// * `NotFound` - the path does not exist
/// * `InvalidArgument` - the path exists but is not a directory
/// * `OperationFailed` - the listing itself failed (permissions, I/O)
pub fn list_candidates(dir: &Path) -> Result<Vec<CandidateFile>, SyncError> {
    let metadata = fs::metadata(dir).map_err(|e| SyncError::from_io(dir, e))?;
    if !metadata.is_dir() {
        return Err(SyncError::InvalidArgument(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let matcher = candidate_matcher()?;
    let mut candidates = Vec::new();

    let entries = fs::read_dir(dir).map_err(|e| SyncError::from_io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::from_io(dir, e))?;

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue, // non-UTF-8 names can never match *.txt
        };
        if !matcher.is_match(&name) {
            continue;
        }

        let file_meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                // File may have vanished between listing and stat. Leave it
                // out of the snapshot rather than failing the whole run.
                eprintln!(
                    "Warning: failed to read metadata for {}: {}",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };
        if !file_meta.is_file() {
            continue;
        }

        let mtime = file_meta
            .modified()
            .map_err(|e| SyncError::from_io(&entry.path(), e))?;

        candidates.push(CandidateFile::new(name, file_meta.len(), mtime));
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}
