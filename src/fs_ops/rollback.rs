use std::io;
use std::path::Path;
use tracing::{debug, warn};

use super::provider::FileSystem;

/// Best-effort removal of a staging file after a failed write.
/// Never returns an error: the failure that triggered the rollback is the one the caller sees.
pub(super) fn rollback(fs: &dyn FileSystem, temp_path: &Path) {
    match fs.remove(temp_path) {
        Ok(()) => debug!(path = %temp_path.display(), "removed staging file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %temp_path.display(), "staging file already gone")
        }
        Err(e) => warn!(
            error = %e,
            path = %temp_path.display(),
            "Failed to remove staging file; it can be cleaned up with a sweep"
        ),
    }
}
