//! Sync executor - per-file state machine

pub mod copy;
pub mod pool;
pub mod version;

pub use copy::copy_file_atomic;
pub use version::{move_to_versioning, unique_versioned_path, versioned_file_name};

use crate::diff::{decide, SyncDecision};
use crate::scanner::list_candidates;
use crate::types::{CandidateFile, RunReport, SyncError, SyncOutcome};
use crate::ui::EventSink;
use crate::Config;
use chrono::Local;
use std::fs;
use std::time::{Duration, SystemTime};

/// Run one synchronization pass
///
/// Enumerates candidates once (an immutable snapshot), applies the per-file
/// transition to each in deterministic order, and emits one outcome per file
/// to the injected sink. A per-file failure is recorded and the run
/// continues; only enumeration and configuration problems abort the run.
pub fn run_sync(config: &Config, sink: &dyn EventSink) -> Result<RunReport, SyncError> {
    let candidates = list_candidates(&config.source)?;
    prepare_directories(config)?;

    let now = SystemTime::now();
    let mut report = RunReport::new();

    for candidate in &candidates {
        let outcome = sync_one(config, candidate, now);
        sink.record(&outcome);
        report.add_outcome(outcome);
    }

    Ok(report)
}

/// Ensure backup and versioning directories exist (skipped in dry-run)
fn prepare_directories(config: &Config) -> Result<(), SyncError> {
    if config.dry_run {
        return Ok(());
    }
    fs::create_dir_all(&config.backup).map_err(|e| SyncError::from_io(&config.backup, e))?;
    fs::create_dir_all(&config.versioning)
        .map_err(|e| SyncError::from_io(&config.versioning, e))?;
    Ok(())
}

/// Apply the full state machine to one candidate
///
/// Never returns an error: every failure is folded into a `Failed` outcome
/// so one file cannot unwind the run.
pub fn sync_one(config: &Config, candidate: &CandidateFile, now: SystemTime) -> SyncOutcome {
    if let Some(window_minutes) = config.modified_within {
        if outside_recency_window(candidate.mtime, now, window_minutes) {
            return SyncOutcome::SkippedByRecency {
                file: candidate.name.clone(),
            };
        }
    }

    match apply_transition(config, candidate) {
        Ok(outcome) => outcome,
        Err(err) => SyncOutcome::Failed {
            file: candidate.name.clone(),
            reason: err.to_string(),
        },
    }
}

fn outside_recency_window(mtime: SystemTime, now: SystemTime, window_minutes: u64) -> bool {
    match now.duration_since(mtime) {
        Ok(elapsed) => elapsed > Duration::from_secs(window_minutes * 60),
        // An mtime in the future counts as recent.
        Err(_) => false,
    }
}

fn apply_transition(
    config: &Config,
    candidate: &CandidateFile,
) -> Result<SyncOutcome, SyncError> {
    let source_path = config.source.join(&candidate.name);
    let backup_path = config.backup.join(&candidate.name);

    match decide(&source_path, &backup_path)? {
        SyncDecision::UpToDate => Ok(SyncOutcome::Skipped {
            file: candidate.name.clone(),
        }),

        SyncDecision::CopyNew => {
            if !config.dry_run {
                copy_file_atomic(&source_path, &backup_path)?;
            }
            Ok(SyncOutcome::Copied {
                file: candidate.name.clone(),
            })
        }

        SyncDecision::Replace => {
            let (versioned_path, versioned_name) = if config.dry_run {
                // Report the name a real run would generate right now,
                // without touching the filesystem.
                let timestamp = version::version_timestamp(Local::now());
                let path = unique_versioned_path(&config.versioning, &candidate.name, &timestamp);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| versioned_file_name(&candidate.name, &timestamp));
                (path, name)
            } else {
                let moved =
                    move_to_versioning(&backup_path, &config.versioning, &candidate.name)?;
                copy_file_atomic(&source_path, &backup_path)?;
                moved
            };

            Ok(SyncOutcome::VersionedReplaced {
                file: candidate.name.clone(),
                versioned_name,
                versioned_path,
                backup_path,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::NullSink;
    use std::path::Path;
    use tempfile::TempDir;

    struct Dirs {
        _root: TempDir,
        config: Config,
    }

    fn setup() -> Dirs {
        let root = TempDir::new().expect("create tempdir");
        let config = Config {
            source: root.path().join("source"),
            backup: root.path().join("backup"),
            versioning: root.path().join("versions"),
            ..Config::default()
        };
        fs::create_dir(&config.source).expect("create source dir");
        Dirs {
            _root: root,
            config,
        }
    }

    fn run(config: &Config) -> RunReport {
        run_sync(config, &NullSink).expect("run sync")
    }

    fn candidate_for(path: &Path) -> CandidateFile {
        let meta = fs::metadata(path).expect("stat candidate");
        CandidateFile::new(
            path.file_name().unwrap().to_string_lossy().to_string(),
            meta.len(),
            meta.modified().expect("candidate mtime"),
        )
    }

    #[test]
    fn test_new_file_is_copied() {
        let dirs = setup();
        fs::write(dirs.config.source.join("a.txt"), b"hello").expect("write source file");

        let report = run(&dirs.config);

        assert_eq!(report.stats.copied, 1);
        assert_eq!(
            fs::read(dirs.config.backup.join("a.txt")).expect("read backup"),
            b"hello"
        );
    }

    #[test]
    fn test_unchanged_file_is_skipped() {
        let dirs = setup();
        fs::create_dir(&dirs.config.backup).expect("create backup dir");
        fs::write(dirs.config.source.join("b.txt"), b"same").expect("write source file");
        fs::write(dirs.config.backup.join("b.txt"), b"same").expect("write backup file");

        let report = run(&dirs.config);

        assert_eq!(report.stats.skipped, 1);
        assert_eq!(report.stats.copied, 0);
        assert_eq!(report.stats.versioned, 0);
    }

    #[test]
    fn test_changed_file_is_versioned_then_replaced() {
        let dirs = setup();
        fs::create_dir(&dirs.config.backup).expect("create backup dir");
        fs::write(dirs.config.source.join("c.txt"), b"new-content").expect("write source file");
        fs::write(dirs.config.backup.join("c.txt"), b"old-content").expect("write backup file");

        let report = run(&dirs.config);

        assert_eq!(report.stats.versioned, 1);
        assert_eq!(
            fs::read(dirs.config.backup.join("c.txt")).expect("read backup"),
            b"new-content"
        );

        match &report.outcomes[0] {
            SyncOutcome::VersionedReplaced {
                versioned_path, ..
            } => {
                assert_eq!(
                    fs::read(versioned_path).expect("read versioned snapshot"),
                    b"old-content"
                );
            }
            other => panic!("expected VersionedReplaced, got {:?}", other),
        }
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let dirs = setup();
        fs::write(dirs.config.source.join("a.txt"), b"one").expect("write a.txt");
        fs::write(dirs.config.source.join("b.txt"), b"two").expect("write b.txt");

        let first = run(&dirs.config);
        assert_eq!(first.stats.copied, 2);

        let second = run(&dirs.config);
        assert_eq!(second.stats.copied, 0);
        assert_eq!(second.stats.versioned, 0);
        assert_eq!(second.stats.skipped, 2);
    }

    #[test]
    fn test_outcomes_follow_enumeration_order() {
        let dirs = setup();
        for name in ["zebra.txt", "apple.txt", "mango.txt"] {
            fs::write(dirs.config.source.join(name), name.as_bytes()).expect("write file");
        }

        let report = run(&dirs.config);
        let files: Vec<&str> = report.outcomes.iter().map(|o| o.file()).collect();

        assert_eq!(files, vec!["apple.txt", "mango.txt", "zebra.txt"]);
    }

    #[test]
    fn test_dry_run_reports_without_mutating() {
        let mut dirs = setup();
        dirs.config.dry_run = true;
        fs::create_dir(&dirs.config.backup).expect("create backup dir");
        fs::write(dirs.config.source.join("new.txt"), b"n").expect("write new file");
        fs::write(dirs.config.source.join("changed.txt"), b"after").expect("write changed source");
        fs::write(dirs.config.backup.join("changed.txt"), b"before").expect("write changed backup");

        let report = run(&dirs.config);

        assert_eq!(report.stats.copied, 1);
        assert_eq!(report.stats.versioned, 1);
        assert!(!dirs.config.backup.join("new.txt").exists());
        assert_eq!(
            fs::read(dirs.config.backup.join("changed.txt")).expect("read backup"),
            b"before"
        );
        assert!(
            !dirs.config.versioning.exists(),
            "dry-run must not create the versioning directory"
        );
    }

    #[test]
    fn test_recency_filter_skips_old_files() {
        let mut dirs = setup();
        dirs.config.modified_within = Some(30);

        let source_file = dirs.config.source.join("old.txt");
        fs::write(&source_file, b"stale").expect("write source file");
        let two_hours_ago = filetime::FileTime::from_unix_time(
            chrono::Utc::now().timestamp() - 2 * 60 * 60,
            0,
        );
        filetime::set_file_mtime(&source_file, two_hours_ago).expect("age source file");

        let report = run(&dirs.config);

        assert_eq!(report.stats.recency_skipped, 1);
        assert!(!dirs.config.backup.join("old.txt").exists());
    }

    #[test]
    fn test_recency_filter_keeps_fresh_files() {
        let mut dirs = setup();
        dirs.config.modified_within = Some(30);
        fs::write(dirs.config.source.join("fresh.txt"), b"now").expect("write source file");

        let report = run(&dirs.config);

        assert_eq!(report.stats.copied, 1);
        assert_eq!(report.stats.recency_skipped, 0);
    }

    #[test]
    fn test_per_file_failure_does_not_abort_run() {
        let dirs = setup();
        fs::write(dirs.config.source.join("good.txt"), b"fine").expect("write good file");

        // A candidate whose source vanished after enumeration.
        let ghost = CandidateFile::new("ghost.txt".to_string(), 0, SystemTime::now());
        let outcome = sync_one(&dirs.config, &ghost, SystemTime::now());
        assert!(outcome.is_failed());

        // The rest of the run is unaffected.
        let report = run(&dirs.config);
        assert!(report.is_clean());
        assert_eq!(report.stats.copied, 1);
    }

    #[test]
    fn test_sync_one_failure_carries_reason() {
        let dirs = setup();
        let source_file = dirs.config.source.join("real.txt");
        fs::write(&source_file, b"content").expect("write source file");
        fs::create_dir_all(dirs.config.backup.join("real.txt"))
            .expect("create dir where backup file belongs");

        let outcome = sync_one(&dirs.config, &candidate_for(&source_file), SystemTime::now());

        match outcome {
            SyncOutcome::Failed { file, reason } => {
                assert_eq!(file, "real.txt");
                assert!(reason.contains("not a regular file"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_outside_recency_window() {
        let now = SystemTime::now();
        let old = now - Duration::from_secs(3 * 60 * 60);
        let fresh = now - Duration::from_secs(60);
        let future = now + Duration::from_secs(60);

        assert!(outside_recency_window(old, now, 30));
        assert!(!outside_recency_window(fresh, now, 30));
        assert!(!outside_recency_window(future, now, 30));
    }
}
