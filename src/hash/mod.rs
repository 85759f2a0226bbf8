//! Content fingerprinting

use crate::types::SyncError;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 256-bit Blake3 content fingerprint
///
/// Two files are considered identical iff their fingerprints compare equal.
/// Fingerprints are recomputed every run and never cached to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hex-encoded digest (64 lowercase characters)
    pub fn to_hex(self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute the fingerprint of a file's full byte content
///
/// The file is streamed in 64KB chunks, so memory use is independent of
/// file size.
///
/// # Errors
/// * `NotFound` - the file does not exist
/// * `InvalidArgument` - the path exists but is not a regular file
/// * `OperationFailed` - the read failed for OS reasons
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint, SyncError> {
    let metadata = std::fs::metadata(path).map_err(|e| SyncError::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(SyncError::InvalidArgument(format!(
            "not a regular file: {}",
            path.display()
        )));
    }

    let mut file = File::open(path).map_err(|e| SyncError::from_io(path, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| SyncError::from_io(path, e))?;
        if bytes_read == 0 {
            break; // EOF
        }
        hasher.update(&buffer[0..bytes_read]);
    }

    Ok(Fingerprint(*hasher.finalize().as_bytes()))
}
