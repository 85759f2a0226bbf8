//! Configuration management

use crate::types::SyncError;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where outcome events get rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Discard all output events
    None,
    /// Print events to the console
    #[default]
    Console,
    /// Append events to the log file
    File,
    /// Console and log file
    Both,
}

/// Command-line interface for txtsync
#[derive(Parser, Debug)]
#[command(
    name = "txtsync",
    version,
    about = "Synchronize .txt files with backup and versioning"
)]
pub struct Cli {
    /// Path to the source folder
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Path to the backup folder
    #[arg(long, value_name = "DIR")]
    pub backup: Option<PathBuf>,

    /// Path to the versioning folder
    #[arg(long, value_name = "DIR")]
    pub versioning: Option<PathBuf>,

    /// Preview actions without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Only sync files modified in the last N minutes
    #[arg(long, value_name = "MINUTES")]
    pub modified_within: Option<u64>,

    /// Logging output target
    #[arg(long, value_enum, value_name = "TARGET")]
    pub log_type: Option<LogTarget>,

    /// Path to the log file (used when log target includes file)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of worker threads (1 = sequential)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// TOML file supplying defaults for any of the above
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Optional TOML defaults file. Explicit CLI flags always win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub source: Option<PathBuf>,
    pub backup: Option<PathBuf>,
    pub versioning: Option<PathBuf>,
    pub dry_run: Option<bool>,
    pub modified_within: Option<u64>,
    pub log_type: Option<LogTarget>,
    pub log_file: Option<PathBuf>,
    pub threads: Option<usize>,
}

impl ConfigFile {
    /// Parse a TOML defaults file
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path).map_err(|e| SyncError::from_io(path, e))?;
        toml::from_str(&content)
            .map_err(|e| SyncError::Config(format!("invalid config file {}: {}", path.display(), e)))
    }
}

/// Global configuration for one sync run
///
/// Constructed once, validated immediately, read-only for the run's duration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory containing candidate `.txt` files
    pub source: PathBuf,

    /// Backup directory files are copied into
    pub backup: PathBuf,

    /// Versioning directory that accumulates timestamped snapshots
    pub versioning: PathBuf,

    /// Report decisions without mutating the filesystem
    pub dry_run: bool,

    /// Only consider source files modified within the last N minutes
    pub modified_within: Option<u64>,

    /// Event rendering target
    pub log_target: LogTarget,

    /// Log file path for `file`/`both` targets
    pub log_file: PathBuf,

    /// Worker threads for per-file transitions (1 = sequential)
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            backup: PathBuf::new(),
            versioning: PathBuf::new(),
            dry_run: false,
            modified_within: None,
            log_target: LogTarget::Console,
            log_file: PathBuf::from("txtsync.log"),
            threads: 1,
        }
    }
}

impl Config {
    /// Validate configuration
    ///
    /// Fails fast, before any file is touched.
    pub fn validate(&self) -> Result<(), SyncError> {
        let dirs = [
            ("source", &self.source),
            ("backup", &self.backup),
            ("versioning", &self.versioning),
        ];

        for (label, dir) in &dirs {
            if dir.as_os_str().is_empty() {
                return Err(SyncError::Config(format!("{} directory is required", label)));
            }
        }

        for i in 0..dirs.len() {
            for (label_b, dir_b) in dirs.iter().skip(i + 1) {
                let (label_a, dir_a) = dirs[i];
                if dir_a == *dir_b {
                    return Err(SyncError::Config(format!(
                        "{} and {} directories must be distinct: {}",
                        label_a,
                        label_b,
                        dir_a.display()
                    )));
                }
            }
        }

        if !self.source.is_dir() {
            return Err(SyncError::Config(format!(
                "source path is not a directory: {}",
                self.source.display()
            )));
        }

        if self.modified_within == Some(0) {
            return Err(SyncError::Config(
                "modified-within must be a positive number of minutes".to_string(),
            ));
        }

        if self.threads == 0 {
            return Err(SyncError::Config(
                "threads must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    /// Merge CLI flags over optional TOML defaults, then validate.
    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let defaults = Config::default();

        let config = Config {
            source: cli
                .source
                .or(file.source)
                .ok_or_else(|| SyncError::Config("source directory is required".to_string()))?,
            backup: cli
                .backup
                .or(file.backup)
                .ok_or_else(|| SyncError::Config("backup directory is required".to_string()))?,
            versioning: cli
                .versioning
                .or(file.versioning)
                .ok_or_else(|| SyncError::Config("versioning directory is required".to_string()))?,
            dry_run: cli.dry_run || file.dry_run.unwrap_or(false),
            modified_within: cli.modified_within.or(file.modified_within),
            log_target: cli
                .log_type
                .or(file.log_type)
                .unwrap_or(defaults.log_target),
            log_file: cli.log_file.or(file.log_file).unwrap_or(defaults.log_file),
            threads: cli.threads.or(file.threads).unwrap_or(defaults.threads),
        };

        config.validate()?;
        Ok(config)
    }
}
