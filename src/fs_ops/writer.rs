//! `FileWriter`: the all-or-nothing write entry point.
//!
//! Each call runs Validating -> Staging -> Committing and stops at the first failure.
//! A failure after the staging file exists removes it before the error is returned;
//! there are no retries and nothing is carried between calls.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use super::options::{WriteConfig, WriterOptions};
use super::provider::{FileSystem, StatProvider};
use super::sweep::SweepReport;
use super::{atomic, device, rollback, stage, sweep, util};
use crate::errors::WriteError;
use crate::platform::{OsFileSystem, OsStat};

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub destination: PathBuf,
    /// Bytes copied from the source.
    pub bytes: u64,
}

/// Writes a source stream to a destination path, or fails without leaving a
/// partial file where the destination should be.
///
/// If `write_file` returns an error for which [`WriteError::is_committed`] is
/// true, the rename already happened: the destination holds the new content but
/// the directory entry may not survive a crash.
///
/// Cloning is cheap; clones share the providers.
#[derive(Clone)]
pub struct FileWriter {
    config: WriteConfig,
    fs: Arc<dyn FileSystem>,
    stat: Arc<dyn StatProvider>,
}

impl fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileWriter").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new(WriterOptions::default())
    }
}

impl FileWriter {
    /// Writer backed by the real filesystem. Always succeeds; unset options take defaults.
    pub fn new(options: WriterOptions) -> Self {
        Self::with_providers(options, Arc::new(OsFileSystem), Arc::new(OsStat))
    }

    /// Writer backed by caller-supplied providers.
    pub fn with_providers(
        options: WriterOptions,
        fs: Arc<dyn FileSystem>,
        stat: Arc<dyn StatProvider>,
    ) -> Self {
        Self {
            config: WriteConfig::resolve(options),
            fs,
            stat,
        }
    }

    pub fn config(&self) -> &WriteConfig {
        &self.config
    }

    /// Copy all of `source` into `destination`, atomically replacing any existing file.
    pub fn write_file<R: Read>(
        &self,
        mut source: R,
        destination: impl AsRef<Path>,
    ) -> Result<WriteOutcome, WriteError> {
        let destination = destination.as_ref();
        let (destination_dir, base_name) =
            util::split_destination(destination).ok_or_else(|| WriteError::InvalidDestination {
                path: destination.to_path_buf(),
            })?;
        let staging_dir = self.config.staging_dir();

        device::validate_device(self.stat.as_ref(), &destination_dir, staging_dir)?;

        let staged = stage::stage(
            self.fs.as_ref(),
            &mut source,
            staging_dir,
            base_name,
            self.config.temp_suffix(),
            self.config.mode(),
        )
        .map_err(|e| self.abort(e))?;
        let bytes = staged.bytes;

        atomic::commit(self.fs.as_ref(), staged, destination, &destination_dir)
            .map_err(|e| self.abort(e))?;

        info!(dest = %destination.display(), bytes, "Wrote file atomically");
        Ok(WriteOutcome {
            destination: destination.to_path_buf(),
            bytes,
        })
    }

    /// Convenience wrapper for in-memory content.
    pub fn write_bytes(
        &self,
        contents: impl AsRef<[u8]>,
        destination: impl AsRef<Path>,
    ) -> Result<WriteOutcome, WriteError> {
        self.write_file(contents.as_ref(), destination)
    }

    /// Remove staging files older than `min_age` left in the staging directory by
    /// interrupted writes.
    pub fn sweep_orphans(&self, min_age: Duration) -> Result<SweepReport, WriteError> {
        let report = sweep::sweep_orphans(
            self.fs.as_ref(),
            self.config.staging_dir(),
            self.config.temp_suffix(),
            min_age,
            SystemTime::now(),
        )?;
        info!(
            dir = %self.config.staging_dir().display(),
            removed = report.removed.len(),
            failed = report.failed.len(),
            skipped_recent = report.skipped_recent,
            "Swept staging directory"
        );
        Ok(report)
    }

    /// Roll back whatever the failure left behind, then hand the error back unchanged.
    fn abort(&self, err: WriteError) -> WriteError {
        if let Some(temp) = err.temp_path() {
            rollback::rollback(self.fs.as_ref(), temp);
        }
        if err.is_committed() {
            warn!(error = %err, "Rename committed but directory sync failed");
        } else {
            debug!(error = %err, "write failed");
        }
        err
    }
}
