//! Core type definitions for txtsync

mod candidate;
mod error;
mod outcome;

pub use candidate::CandidateFile;
pub use error::SyncError;
pub use outcome::{RunReport, RunStats, SyncOutcome};
