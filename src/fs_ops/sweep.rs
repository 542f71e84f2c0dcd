//! Orphan sweep.
//! A crash between staging-file creation and rename/rollback leaves the staging file
//! behind. This pass removes such files once they are older than a threshold, so
//! writes still in flight in other processes are left alone.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use super::provider::FileSystem;
use super::util::is_staging_name;
use crate::errors::WriteError;

/// What a sweep did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Staging files that were removed.
    pub removed: Vec<PathBuf>,
    /// Staging files that matched but could not be removed.
    pub failed: Vec<PathBuf>,
    /// Staging files younger than the threshold (or with unknown mtime).
    pub skipped_recent: usize,
}

pub(super) fn sweep_orphans(
    fs: &dyn FileSystem,
    staging_dir: &Path,
    suffix: &str,
    min_age: Duration,
    now: SystemTime,
) -> Result<SweepReport, WriteError> {
    let entries = fs
        .read_dir(staging_dir)
        .map_err(|source| WriteError::SweepFailed {
            path: staging_dir.to_path_buf(),
            source,
        })?;

    let mut report = SweepReport::default();
    for entry in entries {
        if !entry.is_file || !is_staging_name(&entry.file_name, suffix) {
            continue;
        }

        // Unknown or future mtimes count as recent.
        let old_enough = entry
            .modified
            .and_then(|m| now.duration_since(m).ok())
            .is_some_and(|age| age >= min_age);
        if !old_enough {
            report.skipped_recent += 1;
            continue;
        }

        match fs.remove(&entry.path) {
            Ok(()) => {
                debug!(path = %entry.path.display(), "Removed orphan staging file");
                report.removed.push(entry.path);
            }
            Err(e) => {
                warn!(error = %e, path = %entry.path.display(), "Failed to remove orphan staging file");
                report.failed.push(entry.path);
            }
        }
    }
    Ok(report)
}
