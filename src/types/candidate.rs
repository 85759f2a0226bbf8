//! CandidateFile - A source file discovered during enumeration

use std::time::SystemTime;

/// A `.txt` file found directly in the source directory
///
/// Metadata is captured at enumeration time; the candidate list is an
/// immutable snapshot for the rest of the run. Files appearing in the source
/// after enumeration are not retroactively included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Bare file name, no path separators, `.txt` suffix
    pub name: String,

    /// File size in bytes at enumeration time
    pub size: u64,

    /// Last modification time at enumeration time
    pub mtime: SystemTime,
}

impl CandidateFile {
    /// Create a new candidate
    pub fn new(name: String, size: u64, mtime: SystemTime) -> Self {
        Self { name, size, mtime }
    }
}
