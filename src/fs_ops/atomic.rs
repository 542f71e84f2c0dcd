//! Commit: promote the staged file with a rename, then persist the rename.
//! - The rename is the atomicity boundary; a failed rename leaves the staging file for rollback.
//! - After a successful rename the destination directory is fsynced. Failures there are
//!   reported but never undone: the rename has already consumed the staging file.

use std::path::Path;
use tracing::debug;

use super::provider::FileSystem;
use super::stage::StagedFile;
use crate::errors::WriteError;

pub(super) fn commit(
    fs: &dyn FileSystem,
    staged: StagedFile,
    destination: &Path,
    destination_dir: &Path,
) -> Result<(), WriteError> {
    if let Err(source) = fs.rename(&staged.path, destination) {
        return Err(WriteError::RenameFailed {
            from: staged.path,
            to: destination.to_path_buf(),
            source,
        });
    }
    debug!(from = %staged.path.display(), to = %destination.display(), "renamed staging file");

    sync_dir(fs, destination_dir)
}

/// Open, fsync and close a directory so its entries survive a crash.
fn sync_dir(fs: &dyn FileSystem, dir: &Path) -> Result<(), WriteError> {
    let mut handle = fs.open_dir(dir).map_err(|source| WriteError::DirOpenFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    if let Err(source) = handle.sync() {
        return Err(WriteError::DirSyncFailed {
            path: dir.to_path_buf(),
            source,
        });
    }

    handle.close().map_err(|source| WriteError::DirCloseFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    debug!(dir = %dir.display(), "synced directory");
    Ok(())
}
