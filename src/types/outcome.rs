//! SyncOutcome - Per-file results of a sync run

use std::path::PathBuf;

/// Outcome of processing one candidate file
///
/// Exactly one outcome is produced per candidate. The executor structures
/// the facts; rendering for a display medium is the event sink's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// File was new (missing in backup) and was copied
    Copied { file: String },

    /// Source and backup fingerprints matched, nothing to do
    Skipped { file: String },

    /// Backup differed: old copy moved into the versioning directory,
    /// new content copied into its place
    VersionedReplaced {
        file: String,
        versioned_name: String,
        versioned_path: PathBuf,
        backup_path: PathBuf,
    },

    /// Excluded by the `modified_within` recency window
    SkippedByRecency { file: String },

    /// Transition failed for this file; the run continued
    Failed { file: String, reason: String },
}

impl SyncOutcome {
    /// File name this outcome refers to
    pub fn file(&self) -> &str {
        match self {
            SyncOutcome::Copied { file }
            | SyncOutcome::Skipped { file }
            | SyncOutcome::VersionedReplaced { file, .. }
            | SyncOutcome::SkippedByRecency { file }
            | SyncOutcome::Failed { file, .. } => file,
        }
    }

    /// Check if this outcome records a failure
    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed { .. })
    }
}

/// Aggregated result of one sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Outcome per candidate, in enumeration order
    pub outcomes: Vec<SyncOutcome>,

    /// Aggregate counters
    pub stats: RunStats,
}

/// Counters over a run's outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub copied: usize,
    pub skipped: usize,
    pub versioned: usize,
    pub recency_skipped: usize,
    pub failed: usize,
}

impl RunReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome and update counters
    pub fn add_outcome(&mut self, outcome: SyncOutcome) {
        match &outcome {
            SyncOutcome::Copied { .. } => self.stats.copied += 1,
            SyncOutcome::Skipped { .. } => self.stats.skipped += 1,
            SyncOutcome::VersionedReplaced { .. } => self.stats.versioned += 1,
            SyncOutcome::SkippedByRecency { .. } => self.stats.recency_skipped += 1,
            SyncOutcome::Failed { .. } => self.stats.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// True when no per-file outcome failed
    pub fn is_clean(&self) -> bool {
        self.stats.failed == 0
    }

    /// Number of candidates processed
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if the run saw no candidates at all
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
