//! I/O helper utilities.
//!
//! Enriches io::Error and WriteError with actionable, platform-aware hints.
//!
//! Usage:
//!   // in functions returning anyhow::Result<_>
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create dir", dir))?;
//!
//!   // when reporting a failed write to a user
//!   out::print_error(&describe_error(&err));

use anyhow::anyhow;
use std::io;
use std::path::Path;

use crate::errors::WriteError;

/// Short hint for an I/O error, keyed on the raw OS code where available.
pub fn io_hint(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let hint = match code {
                libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions."),
                libc::EXDEV => Some("cross-filesystem; atomic rename not possible."),
                libc::EBUSY => Some("resource busy; ensure no other process is writing."),
                libc::ENOENT => Some("path not found; verify it exists."),
                libc::ENOTDIR => Some("a path component is not a directory."),
                libc::EISDIR => Some("destination is a directory."),
                libc::ENOSPC => Some("insufficient space on device."),
                libc::EDQUOT => Some("disk quota exceeded."),
                libc::EROFS => Some("read-only filesystem; cannot write here."),
                libc::EIO => Some("I/O error from the device; the disk may be failing."),
                libc::ELOOP => Some("too many symbolic link levels (ELOOP); possible symlink cycle."),
                libc::ENAMETOOLONG => Some("filename or path too long; shorten path segments."),
                libc::EMFILE => Some("process file descriptor limit reached; close files or raise limits."),
                libc::ENFILE => Some("system-wide file table overflow; reduce open files."),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        #[cfg(windows)]
        {
            // Common Win32 errors
            let hint = match code {
                5 => Some("access denied; check permissions."),               // ERROR_ACCESS_DENIED
                17 => Some("not same device; cross-filesystem move."),        // ERROR_NOT_SAME_DEVICE
                32 => Some("sharing violation; file is in use."),             // ERROR_SHARING_VIOLATION
                2 | 3 => Some("path not found; verify it exists."),           // FILE/ PATH NOT FOUND
                112 => Some("insufficient disk space."),                      // ERROR_DISK_FULL
                19 => Some("write protected / read-only media."),             // ERROR_WRITE_PROTECT
                206 => Some("filename or path too long (MAX_PATH exceeded)."), // ERROR_FILENAME_EXCED_RANGE
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
    }

    // Fallback to Kind-based hints
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions."),
        io::ErrorKind::NotFound => Some("path not found; verify it exists."),
        io::ErrorKind::AlreadyExists => Some("already exists; remove or choose a unique name."),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
            Some("busy/timed out; retry after the current write finishes.")
        }
        _ => None,
    }
}

/// Format "<op> '<path>': <err>" plus hint and OS code.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = io_hint(e) {
        msg.push_str(" — ");
        msg.push_str(hint);
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {}]", code));
    }
    msg
}

/// Adapter for anyhow::Result code.
/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// User-facing description of a failed write, with a hint and the commit state spelled out.
pub fn describe_error(err: &WriteError) -> String {
    let mut msg = err.to_string();
    match err {
        WriteError::DeviceMismatch { .. } => {
            msg.push_str(" — choose a staging directory on the same filesystem as the destination.");
        }
        _ => {
            if let Some(hint) = err.io_error().and_then(io_hint) {
                msg.push_str(" — ");
                msg.push_str(hint);
            }
        }
    }
    if err.is_committed() {
        msg.push_str(" (the destination already holds the new content; the rename may not survive a crash)");
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn notfound_fallback_hint_includes_path() {
        let p = Path::new("/nonexistent/path/for/test");
        let f = io_error_with_help("open", p);
        let err = f(io::Error::from(io::ErrorKind::NotFound));
        let msg = format!("{}", err);
        assert!(msg.contains("open"));
        assert!(msg.contains(p.to_string_lossy().as_ref()));
        assert!(msg.contains("path not found"));
    }

    #[cfg(unix)]
    #[test]
    fn enospc_hint_present() {
        let p = Path::new("/tmp");
        let f = io_error_with_help("write", p);
        let err = f(io::Error::from_raw_os_error(libc::ENOSPC));
        let msg = format!("{}", err);
        assert!(msg.contains("insufficient space"), "msg was: {}", msg);
        assert!(msg.contains("os code"), "should include os code in message");
    }

    #[cfg(unix)]
    #[test]
    fn exdev_hint_on_rename_failure() {
        let err = WriteError::RenameFailed {
            from: PathBuf::from("/tmp/a.tmpabcdef"),
            to: PathBuf::from("/mnt/a"),
            source: io::Error::from_raw_os_error(libc::EXDEV),
        };
        assert!(describe_error(&err).contains("cross-filesystem"));
    }

    #[test]
    fn committed_errors_say_so() {
        let err = WriteError::DirSyncFailed {
            path: PathBuf::from("/data"),
            source: io::Error::other("sync failed"),
        };
        let msg = describe_error(&err);
        assert!(msg.contains("already holds the new content"), "msg was: {msg}");
    }

    #[test]
    fn device_mismatch_suggests_staging_dir() {
        let err = WriteError::DeviceMismatch {
            destination: PathBuf::from("/data"),
            staging: PathBuf::from("/tmp"),
        };
        assert!(describe_error(&err).contains("staging directory on the same filesystem"));
    }
}
