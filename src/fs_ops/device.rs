//! Same-device precondition for atomic rename.
//! Runs before any data is written so a knowable mismatch never leaves a staging file.

use std::path::Path;
use tracing::debug;

use super::provider::StatProvider;
use crate::errors::{DirRole, WriteError};

pub(super) fn validate_device(
    stat: &dyn StatProvider,
    destination_dir: &Path,
    staging_dir: &Path,
) -> Result<(), WriteError> {
    let destination_dev = stat
        .device_id(destination_dir)
        .map_err(|source| WriteError::StatFailed {
            role: DirRole::Destination,
            path: destination_dir.to_path_buf(),
            source,
        })?;

    let staging_dev = stat
        .device_id(staging_dir)
        .map_err(|source| WriteError::StatFailed {
            role: DirRole::Staging,
            path: staging_dir.to_path_buf(),
            source,
        })?;

    if destination_dev != staging_dev {
        debug!(
            destination = %destination_dir.display(),
            destination_dev = %destination_dev,
            staging = %staging_dir.display(),
            staging_dev = %staging_dev,
            "device mismatch"
        );
        return Err(WriteError::DeviceMismatch {
            destination: destination_dir.to_path_buf(),
            staging: staging_dir.to_path_buf(),
        });
    }

    debug!(device = %destination_dev, "staging and destination share a device");
    Ok(())
}
