//! OS-backed providers: the bindings `FileWriter::new` uses by default.
//!
//! - `create_unique` delegates collision avoidance to `tempfile` (random tail + O_EXCL);
//!   the file is detached from tempfile's auto-delete so rollback stays explicit.
//! - Handles surface close errors where the platform reports them.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::fs_ops::{DeviceId, DirEntryInfo, FileHandle, FileSystem, StatProvider, TEMP_RAND_LEN};

use super::sys;

/// File-system provider backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

/// Stat provider backed by `stat(2)` (Unix) or the volume mount point (Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsStat;

struct OsFile {
    file: File,
}

impl Write for OsFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl FileHandle for OsFile {
    fn set_mode(&mut self, mode: u32) -> io::Result<()> {
        sys::set_file_mode(&self.file, mode)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        sys::close_file(self.file)
    }
}

/// Stand-in for a directory that cannot be opened for syncing on this platform.
struct UnsyncableDir;

impl Write for UnsyncableDir {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "cannot write to a directory"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileHandle for UnsyncableDir {
    fn set_mode(&mut self, _mode: u32) -> io::Result<()> {
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for OsFileSystem {
    fn create_unique(&self, dir: &Path, prefix: &OsStr) -> io::Result<(Box<dyn FileHandle>, PathBuf)> {
        let named = tempfile::Builder::new()
            .prefix(prefix)
            .rand_bytes(TEMP_RAND_LEN)
            .tempfile_in(dir)?;
        let (file, path) = named.keep().map_err(|e| e.error)?;
        Ok((Box::new(OsFile { file }), path))
    }

    fn open_dir(&self, dir: &Path) -> io::Result<Box<dyn FileHandle>> {
        match sys::open_dir(dir)? {
            Some(file) => Ok(Box::new(OsFile { file })),
            None => Ok(Box::new(UnsyncableDir)),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            // Entries can vanish between listing and stat; skip them.
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            entries.push(DirEntryInfo {
                path: entry.path(),
                file_name: entry.file_name(),
                is_file: meta.is_file(),
                modified: meta.modified().ok(),
            });
        }
        Ok(entries)
    }
}

impl StatProvider for OsStat {
    fn device_id(&self, path: &Path) -> io::Result<DeviceId> {
        sys::device_id(path)
    }
}
