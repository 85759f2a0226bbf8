//! Main sync command

use crate::config::LogTarget;
use crate::executor::pool::run_sync_parallel;
use crate::executor::run_sync;
use crate::scanner::list_candidates;
use crate::types::{RunReport, SyncError};
use crate::ui::{build_sink, ProgressSink};
use crate::Config;
use console::style;
use std::sync::Arc;

/// Run one synchronization pass with the configured sinks
///
/// Validates the configuration, assembles the event sink from the log
/// target, runs the executor (sequential, or pooled when `threads > 1`) and
/// prints a summary. Exit-status semantics are the caller's job: the report
/// says whether any per-file outcome failed.
pub fn run(config: Config) -> Result<RunReport, SyncError> {
    config.validate()?;

    let sink = build_sink(config.log_target, &config.log_file)?;

    // Pre-count candidates so the bar has a length; the executor snapshots
    // the directory again itself.
    let total = list_candidates(&config.source)?.len() as u64;
    let progress = Arc::new(ProgressSink::new(total, sink));

    let result = if config.threads > 1 {
        run_sync_parallel(&config, Arc::clone(&progress) as Arc<dyn crate::ui::EventSink>)
    } else {
        run_sync(&config, progress.as_ref())
    };
    progress.finish();
    let report = result?;

    // File-only logging keeps the console silent, like `none`.
    if matches!(config.log_target, LogTarget::Console | LogTarget::Both) {
        print_summary(&config, &report);
    }

    Ok(report)
}

fn print_summary(config: &Config, report: &RunReport) {
    println!("{}", format_summary(report));
    if config.dry_run {
        println!("Dry-run mode: no changes were made.");
    }
}

fn format_summary(report: &RunReport) -> String {
    let stats = &report.stats;
    let failed = if stats.failed > 0 {
        style(format!("{} failed", stats.failed)).red().to_string()
    } else {
        format!("{} failed", stats.failed)
    };

    format!(
        "Sync complete: {} copied, {} versioned, {} skipped, {} outside window, {}",
        stats.copied, stats.versioned, stats.skipped, stats.recency_skipped, failed
    )
}
