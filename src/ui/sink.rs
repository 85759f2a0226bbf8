//! Event sinks - render sync outcomes for the outside world
//!
//! The executor never formats for a display medium; it hands each
//! `SyncOutcome` to an injected sink. Sinks are assembled once per run from
//! the configured log target, never reached through global state.

use crate::config::LogTarget;
use crate::types::{SyncError, SyncOutcome};
use chrono::Local;
use console::style;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Receiver for per-file outcome events
pub trait EventSink: Send + Sync {
    /// Record one completed per-file outcome
    fn record(&self, outcome: &SyncOutcome);
}

/// Human-readable line for an outcome, shared by all sinks
pub fn render_outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Copied { file } => format!("Copying new file: {}", file),
        SyncOutcome::VersionedReplaced {
            file,
            versioned_name,
            ..
        } => format!("Versioning: {} -> {}", file, versioned_name),
        SyncOutcome::Skipped { file } => format!("Skipped (unchanged): {}", file),
        SyncOutcome::SkippedByRecency { file } => {
            format!("Skipped (outside recency window): {}", file)
        }
        SyncOutcome::Failed { file, reason } => format!("Failed: {}: {}", file, reason),
    }
}

/// Sink that prints styled lines to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn record(&self, outcome: &SyncOutcome) {
        let line = render_outcome(outcome);
        let styled = match outcome {
            SyncOutcome::Copied { .. } => style(line).green().to_string(),
            SyncOutcome::VersionedReplaced { .. } => style(line).yellow().to_string(),
            SyncOutcome::Failed { .. } => style(line).red().to_string(),
            SyncOutcome::Skipped { .. } | SyncOutcome::SkippedByRecency { .. } => {
                style(line).dim().to_string()
            }
        };
        println!("{}", styled);
    }
}

/// Sink that appends timestamped lines to a log file
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Open (or create) the log file in append mode
    pub fn open(path: &Path) -> Result<Self, SyncError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SyncError::from_io(path, e))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventSink for FileSink {
    fn record(&self, outcome: &SyncOutcome) {
        let level = if outcome.is_failed() { "ERROR" } else { "INFO" };
        if let Ok(mut file) = self.file.lock() {
            // Log write failures are not per-file sync failures; drop them.
            let _ = writeln!(
                file,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                level,
                render_outcome(outcome)
            );
        }
    }
}

/// Fan-out sink
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Box<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for MultiSink {
    fn record(&self, outcome: &SyncOutcome) {
        for sink in &self.sinks {
            sink.record(outcome);
        }
    }
}

/// Sink that discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _outcome: &SyncOutcome) {}
}

/// Assemble the sink for a run from the configured log target
pub fn build_sink(target: LogTarget, log_file: &Path) -> Result<Box<dyn EventSink>, SyncError> {
    match target {
        LogTarget::None => Ok(Box::new(NullSink)),
        LogTarget::Console => Ok(Box::new(ConsoleSink)),
        LogTarget::File => Ok(Box::new(FileSink::open(log_file)?)),
        LogTarget::Both => Ok(Box::new(MultiSink::new(vec![
            Box::new(ConsoleSink),
            Box::new(FileSink::open(log_file)?),
        ]))),
    }
}
