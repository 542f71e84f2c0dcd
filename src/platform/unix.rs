//! Unix implementations of platform helpers (Linux, macOS, BSDs).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::os::unix::io::IntoRawFd;
use std::path::Path;

use crate::fs_ops::DeviceId;

/// Device number (`st_dev`) of the filesystem holding `path`. Follows symlinks.
pub fn device_id(path: &Path) -> io::Result<DeviceId> {
    let meta = fs::metadata(path)?;
    Ok(DeviceId::from_number(meta.dev()))
}

/// fchmod on an open file; not affected by the process umask.
pub fn set_file_mode(file: &File, mode: u32) -> io::Result<()> {
    file.set_permissions(fs::Permissions::from_mode(mode))
}

/// Close the descriptor and report the result. `File`'s drop ignores close
/// errors, which on some filesystems (NFS) are the only report of a failed write.
pub fn close_file(file: File) -> io::Result<()> {
    let fd = file.into_raw_fd();
    let rc = unsafe { libc::close(fd) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Open a directory read-only so it can be fsynced.
pub fn open_dir(dir: &Path) -> io::Result<Option<File>> {
    File::open(dir).map(Some)
}

/// Append-only handle on a log file. A file this call creates is owner-only (0600
/// before umask); an existing file keeps its mode. The parent is created if missing.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).mode(0o600).open(path)
}

/// POSIX chmod 0700 for directories.
pub fn set_dir_mode_0700(path: &Path) -> io::Result<()> {
    let perm = fs::Permissions::from_mode(0o700);
    fs::set_permissions(path, perm)
}
