//! Staging: write the full source into a fresh, uniquely named file and make it durable.
//!
//! Order matters:
//! - mode is applied before any content is written;
//! - content is fsynced, then the handle is closed with its result checked;
//! - any failure after creation carries the staging path so the caller can roll it back.
//!
//! The handle is always released before an error is returned.

use std::ffi::OsStr;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::provider::{FileHandle, FileSystem};
use super::util::temp_prefix;
use crate::errors::WriteError;

const BUF_SIZE: usize = 1024 * 1024; // 1 MiB buffers

/// A fully written, fsynced and closed staging file awaiting rename.
#[derive(Debug)]
pub(super) struct StagedFile {
    pub(super) path: PathBuf,
    pub(super) bytes: u64,
}

pub(super) fn stage<R: Read + ?Sized>(
    fs: &dyn FileSystem,
    source: &mut R,
    staging_dir: &Path,
    base_name: &OsStr,
    suffix: &str,
    mode: u32,
) -> Result<StagedFile, WriteError> {
    let prefix = temp_prefix(base_name, suffix);
    let (mut handle, path) =
        fs.create_unique(staging_dir, &prefix)
            .map_err(|source| WriteError::TempCreateFailed {
                dir: staging_dir.to_path_buf(),
                source,
            })?;
    debug!(path = %path.display(), "created staging file");

    if let Err(source) = handle.set_mode(mode) {
        return Err(WriteError::ChmodFailed { path, source });
    }

    let bytes = match copy_into(source, handle.as_mut()) {
        Ok(n) => n,
        Err(source) => return Err(WriteError::CopyFailed { path, source }),
    };

    if let Err(source) = handle.sync() {
        return Err(WriteError::SyncFailed { path, source });
    }

    if let Err(source) = handle.close() {
        return Err(WriteError::CloseFailed { path, source });
    }

    debug!(path = %path.display(), bytes, mode = %format!("{mode:o}"), "staging file durable");
    Ok(StagedFile { path, bytes })
}

/// Buffered copy; read and write errors are indistinguishable to the caller.
fn copy_into<R: Read + ?Sized>(source: &mut R, dst: &mut dyn FileHandle) -> io::Result<u64> {
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst);
    let bytes = io::copy(source, &mut writer)?;
    writer.flush()?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OsFileSystem;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn stages_content_under_prefixed_unique_name() {
        let dir = tempdir().unwrap();
        let mut src: &[u8] = b"hello world";
        let staged = stage(&OsFileSystem, &mut src, dir.path(), OsStr::new("a.txt"), "tmp", 0o600).unwrap();
        assert_eq!(staged.bytes, 11);
        assert_eq!(fs::read(&staged.path).unwrap(), b"hello world");
        let name = staged.path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("a.txt.tmp"), "unexpected staging name {name}");
    }

    #[test]
    fn large_content_crosses_buffer_boundaries() {
        let dir = tempdir().unwrap();
        let size = 2 * BUF_SIZE + 123;
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        let mut src = data.as_slice();
        let staged = stage(&OsFileSystem, &mut src, dir.path(), OsStr::new("big.bin"), "tmp", 0o600).unwrap();
        assert_eq!(staged.bytes as usize, size);
        assert_eq!(fs::read(&staged.path).unwrap(), data);
    }

    #[cfg(unix)]
    #[test]
    fn mode_is_applied() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let mut src: &[u8] = b"m";
        let staged = stage(&OsFileSystem, &mut src, dir.path(), OsStr::new("m"), "tmp", 0o640).unwrap();
        let mode = fs::metadata(&staged.path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn missing_staging_dir_fails_before_creating_anything() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let mut src: &[u8] = b"x";
        let err = stage(&OsFileSystem, &mut src, &missing, OsStr::new("x"), "tmp", 0o600).unwrap_err();
        assert!(matches!(err, WriteError::TempCreateFailed { .. }));
        assert!(err.temp_path().is_none());
    }
}
