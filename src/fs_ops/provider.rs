//! Capability seams consumed by the write protocol.
//! - `FileSystem`: create-unique, open dir, rename, remove, read dir.
//! - `FileHandle`: an open file or directory with chmod/sync/close.
//! - `StatProvider`: path -> device identifier.
//!
//! Production code binds these to the OS (see `platform`); tests bind scripted fakes.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// An open handle produced by a [`FileSystem`].
///
/// `close` consumes the handle and reports the OS result; dropping a handle
/// without closing it releases it silently.
pub trait FileHandle: Write + Send {
    /// Apply a permission bitmask to the open file.
    fn set_mode(&mut self, mode: u32) -> io::Result<()>;

    /// Force file data and metadata to stable storage.
    fn sync(&mut self) -> io::Result<()>;

    fn close(self: Box<Self>) -> io::Result<()>;
}

/// One entry returned by [`FileSystem::read_dir`].
#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub path: PathBuf,
    pub file_name: OsString,
    pub is_file: bool,
    pub modified: Option<SystemTime>,
}

pub trait FileSystem: Send + Sync {
    /// Atomically create a new file in `dir` whose name starts with `prefix`
    /// and is unique within `dir`. Returns the open handle and its path.
    fn create_unique(&self, dir: &Path, prefix: &OsStr) -> io::Result<(Box<dyn FileHandle>, PathBuf)>;

    /// Open a directory so its metadata can be synced.
    fn open_dir(&self, dir: &Path) -> io::Result<Box<dyn FileHandle>>;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove(&self, path: &Path) -> io::Result<()>;

    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;
}

/// Opaque token identifying the storage device backing a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(DeviceRepr);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DeviceRepr {
    Number(u64),
    Volume(OsString),
}

impl DeviceId {
    /// Device number as reported by `stat(2)` (`st_dev`).
    pub fn from_number(dev: u64) -> Self {
        DeviceId(DeviceRepr::Number(dev))
    }

    /// Volume mount point, for platforms without device numbers.
    pub fn from_volume(root: impl Into<OsString>) -> Self {
        DeviceId(DeviceRepr::Volume(root.into()))
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            DeviceRepr::Number(dev) => write!(f, "dev:{dev}"),
            DeviceRepr::Volume(root) => write!(f, "volume:{}", root.to_string_lossy()),
        }
    }
}

pub trait StatProvider: Send + Sync {
    fn device_id(&self, path: &Path) -> io::Result<DeviceId>;
}
