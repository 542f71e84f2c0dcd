//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Content is read from stdin unless --source is given.
//! - --debug is a shorthand for --log-level debug.
//! - Flags override values loaded from the XML config.

use clap::{Parser, ValueHint};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::types::{AppConfig, LogLevel, parse_mode};

/// Default minimum age of staging files removed by --sweep.
pub const DEFAULT_SWEEP_MIN_AGE_SECS: u64 = 3600;

/// Atomically replace a file with the contents of stdin (or --source).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Write a file all-or-nothing: stage, fsync, rename, fsync directory"
)]
pub struct Args {
    /// File to create or replace.
    #[arg(value_name = "DESTINATION", value_hint = ValueHint::FilePath)]
    pub destination: Option<PathBuf>,

    /// Read content from this file instead of stdin.
    #[arg(long, short = 's', value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub source: Option<PathBuf>,

    /// Directory for staging files; must be on the same filesystem as DESTINATION.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub staging_dir: Option<PathBuf>,

    /// Suffix marking staging files (default: tmp).
    #[arg(long = "suffix", value_name = "SUFFIX")]
    pub temp_suffix: Option<String>,

    /// Octal permission bits for the written file, e.g. 0644 (default: 0200).
    #[arg(long, value_name = "OCTAL", value_parser = parse_mode)]
    pub mode: Option<u32>,

    /// Remove staging files orphaned by interrupted writes, then exit.
    /// Requires an explicit staging directory (flag or config); the shared
    /// platform temp dir is never swept.
    #[arg(long, conflicts_with_all = ["destination", "source"])]
    pub sweep: bool,

    /// With --sweep: only remove staging files at least this many seconds old.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_SWEEP_MIN_AGE_SECS, requires = "sweep")]
    pub min_age: u64,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Print where atomicfs will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by atomicfs and exit")]
    pub print_config: bool,

    /// Write a template config file at the config location, then exit.
    #[arg(long, conflicts_with = "print_config")]
    pub init_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    pub fn min_age(&self) -> Duration {
        Duration::from_secs(self.min_age)
    }

    /// Apply CLI overrides to a loaded config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(dir) = &self.staging_dir {
            cfg.staging_dir = Some(dir.clone());
        }
        if let Some(suffix) = &self.temp_suffix {
            cfg.temp_suffix = Some(suffix.clone());
        }
        if let Some(mode) = self.mode {
            cfg.mode = Some(mode);
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
