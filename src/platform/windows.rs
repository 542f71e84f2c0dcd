//! Windows implementations of platform helpers (best-effort, minimal ACL awareness).
//!
//! Notes:
//! - Windows lacks POSIX mode semantics; only the read-only bit is derived from the mode.
//! - Directories cannot be fsynced through std; `open_dir` yields no handle.
//! - Device identity is the volume mount point reported by `GetVolumePathNameW`.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io;
use std::iter::once;
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::Path;

use windows_sys::Win32::Storage::FileSystem::GetVolumePathNameW;

use crate::fs_ops::DeviceId;

const MAX_VOLUME_PATH: usize = 1024;

/// Volume mount point (e.g. `C:\`) of the filesystem holding `path`.
pub fn device_id(path: &Path) -> io::Result<DeviceId> {
    // Surface NotFound the same way stat(2) would on Unix.
    std::fs::metadata(path)?;
    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(once(0)).collect();
    let mut buf = vec![0u16; MAX_VOLUME_PATH];
    let ok = unsafe { GetVolumePathNameW(wide.as_ptr(), buf.as_mut_ptr(), buf.len() as u32) };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    let root = OsString::from_wide(&buf[..len]);
    Ok(DeviceId::from_volume(root.to_string_lossy().to_lowercase()))
}

/// Map a POSIX mode onto the read-only attribute: no write bits => read-only.
pub fn set_file_mode(file: &File, mode: u32) -> io::Result<()> {
    let mut perms = file.metadata()?.permissions();
    perms.set_readonly(mode & 0o222 == 0);
    file.set_permissions(perms)
}

/// Close errors are not observable through std on Windows.
pub fn close_file(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

/// Directory metadata cannot be flushed via std; callers treat `None` as synced.
pub fn open_dir(_dir: &Path) -> io::Result<Option<File>> {
    Ok(None)
}

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// No-op on Windows; POSIX-style directory modes are not applicable.
pub fn set_dir_mode_0700(_path: &Path) -> io::Result<()> {
    Ok(())
}
