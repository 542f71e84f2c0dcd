//! Writer options and their resolved, immutable form.
//! Every option may be left unset; defaults are applied once, at construction.

use std::path::{Path, PathBuf};

/// Suffix used to mark staging files when none is configured.
pub const DEFAULT_TEMP_SUFFIX: &str = "tmp";
/// Owner write-only.
pub const DEFAULT_MODE: u32 = 0o200;

/// Caller-supplied options; `None` (or an empty/zero value) selects the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterOptions {
    /// Where staging files are created. Must be on the same device as every
    /// destination written. Default: the platform temp directory.
    pub staging_dir: Option<PathBuf>,
    /// Appended to the destination file name to name staging files. A single
    /// leading '.' is ignored. Default: "tmp".
    pub temp_suffix: Option<String>,
    /// Permission bits applied to the staging file (and so the destination).
    /// Default: 0o200.
    pub mode: Option<u32>,
}

impl WriterOptions {
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn temp_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.temp_suffix = Some(suffix.into());
        self
    }

    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Resolved writer configuration. Fields are fixed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteConfig {
    staging_dir: PathBuf,
    temp_suffix: String,
    mode: u32,
}

impl WriteConfig {
    pub fn resolve(options: WriterOptions) -> Self {
        let staging_dir = options
            .staging_dir
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(std::env::temp_dir);

        let temp_suffix = options
            .temp_suffix
            .as_deref()
            .map(|s| s.strip_prefix('.').unwrap_or(s))
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TEMP_SUFFIX)
            .to_string();

        // Only permission bits (incl. setuid/setgid/sticky) are meaningful to chmod.
        let mode = options
            .mode
            .map(|m| m & 0o7777)
            .filter(|m| *m != 0)
            .unwrap_or(DEFAULT_MODE);

        Self {
            staging_dir,
            temp_suffix,
            mode,
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn temp_suffix(&self) -> &str {
        &self.temp_suffix
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self::resolve(WriterOptions::default())
    }
}

impl From<WriterOptions> for WriteConfig {
    fn from(options: WriterOptions) -> Self {
        Self::resolve(options)
    }
}
