//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

mod os;
#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
use unix as sys;
#[cfg(not(unix))]
use windows as sys;

pub use os::{OsFileSystem, OsStat};
pub use sys::{open_log_file_secure_append, set_dir_mode_0700};
