//! # txtsync - .txt file synchronization with backup versioning
//!
//! One-shot, locally-run synchronization: `.txt` files in a source directory
//! are mirrored into a backup directory, and prior versions of changed files
//! are preserved in a separate versioning directory under timestamped names.
//! Change detection is content-based (Blake3 fingerprints), never
//! metadata-only.

// Module declarations
pub mod commands;
pub mod config;
pub mod diff;
pub mod executor;
pub mod hash;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::{Config, LogTarget};
pub use types::{CandidateFile, RunReport, SyncError, SyncOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
