//! Core configuration types.
//! - AppConfig holds the CLI's runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.
//! - parse_mode reads octal permission strings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::fs_ops::WriterOptions;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Parse an octal permission string: "0600", "600" or "0o600".
pub fn parse_mode(s: &str) -> Result<u32, String> {
    let t = s.trim();
    let digits = t
        .strip_prefix("0o")
        .or_else(|| t.strip_prefix("0O"))
        .unwrap_or(t);
    if digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return Err(format!("invalid mode '{s}': expected octal such as 0600"));
    }
    let mode = u32::from_str_radix(digits, 8)
        .map_err(|_| format!("invalid mode '{s}': expected octal such as 0600"))?;
    if mode > 0o7777 {
        return Err(format!("invalid mode '{s}': must not exceed 07777"));
    }
    Ok(mode)
}

/// Runtime configuration used by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Staging directory; None = platform temp dir
    pub staging_dir: Option<PathBuf>,
    /// Staging file suffix; None = "tmp"
    pub temp_suffix: Option<String>,
    /// Destination mode; None = 0200
    pub mode: Option<u32>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Options for the library writer; unset values are resolved by the writer itself.
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            staging_dir: self.staging_dir.clone(),
            temp_suffix: self.temp_suffix.clone(),
            mode: self.mode,
        }
    }
}
