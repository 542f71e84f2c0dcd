//! Scripted providers shared by the integration tests.
//!
//! `ScriptedFs` forwards to the real filesystem and fails exactly the steps it is told to.
//! `FakeStat` reports caller-chosen device ids for chosen paths and falls back to the OS.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use atomicfs::{
    DeviceId, DirEntryInfo, FileHandle, FileSystem, FileWriter, OsFileSystem, OsStat, StatProvider,
    WriterOptions,
};

/// A step of the protocol that `ScriptedFs` can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Create,
    Chmod,
    Write,
    Sync,
    Close,
    Rename,
    OpenDir,
    DirSync,
    DirClose,
    Remove,
    ReadDir,
}

fn injected(fault: Fault) -> io::Error {
    match fault {
        Fault::Rename => io::Error::other("disk full"),
        other => io::Error::other(format!("injected {other:?} failure")),
    }
}

#[derive(Default)]
pub struct ScriptedFs {
    inner: OsFileSystem,
    faults: HashSet<Fault>,
    /// Every path passed to `remove`, successful or not.
    pub removed: Mutex<Vec<PathBuf>>,
    /// Every (from, to) pair passed to `rename`.
    pub renamed: Mutex<Vec<(PathBuf, PathBuf)>>,
    /// Every provider call, in order, including those made on handles.
    pub events: Events,
}

pub type Events = Arc<Mutex<Vec<&'static str>>>;

fn record(events: &Events, what: &'static str) {
    events.lock().unwrap().push(what);
}

impl ScriptedFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(faults: &[Fault]) -> Self {
        Self {
            faults: faults.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Recorded calls with consecutive writes collapsed into one "write".
    pub fn event_trail(&self) -> Vec<&'static str> {
        let mut trail = self.events.lock().unwrap().clone();
        trail.dedup_by(|a, b| *a == "write" && *b == "write");
        trail
    }

    fn check(&self, fault: Fault) -> io::Result<()> {
        if self.faults.contains(&fault) {
            Err(injected(fault))
        } else {
            Ok(())
        }
    }

    fn fault(&self, fault: Fault) -> Option<Fault> {
        self.faults.contains(&fault).then_some(fault)
    }
}

struct ScriptedHandle {
    inner: Box<dyn FileHandle>,
    events: Events,
    /// Event names for sync/close; directory handles report "dir_sync"/"dir_close".
    labels: (&'static str, &'static str),
    chmod: Option<Fault>,
    write: Option<Fault>,
    sync: Option<Fault>,
    close: Option<Fault>,
}

impl Write for ScriptedHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        record(&self.events, "write");
        match self.write {
            Some(f) => Err(injected(f)),
            None => self.inner.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl FileHandle for ScriptedHandle {
    fn set_mode(&mut self, mode: u32) -> io::Result<()> {
        record(&self.events, "chmod");
        match self.chmod {
            Some(f) => Err(injected(f)),
            None => self.inner.set_mode(mode),
        }
    }

    fn sync(&mut self) -> io::Result<()> {
        record(&self.events, self.labels.0);
        match self.sync {
            Some(f) => Err(injected(f)),
            None => self.inner.sync(),
        }
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        record(&self.events, self.labels.1);
        // The real handle is always released; the fault only changes what is reported.
        let res = self.inner.close();
        match self.close {
            Some(f) => Err(injected(f)),
            None => res,
        }
    }
}

impl FileSystem for ScriptedFs {
    fn create_unique(&self, dir: &Path, prefix: &OsStr) -> io::Result<(Box<dyn FileHandle>, PathBuf)> {
        record(&self.events, "create");
        self.check(Fault::Create)?;
        let (inner, path) = self.inner.create_unique(dir, prefix)?;
        let handle = ScriptedHandle {
            inner,
            events: Arc::clone(&self.events),
            labels: ("sync", "close"),
            chmod: self.fault(Fault::Chmod),
            write: self.fault(Fault::Write),
            sync: self.fault(Fault::Sync),
            close: self.fault(Fault::Close),
        };
        Ok((Box::new(handle), path))
    }

    fn open_dir(&self, dir: &Path) -> io::Result<Box<dyn FileHandle>> {
        record(&self.events, "open_dir");
        self.check(Fault::OpenDir)?;
        let inner = self.inner.open_dir(dir)?;
        Ok(Box::new(ScriptedHandle {
            inner,
            events: Arc::clone(&self.events),
            labels: ("dir_sync", "dir_close"),
            chmod: None,
            write: None,
            sync: self.fault(Fault::DirSync),
            close: self.fault(Fault::DirClose),
        }))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        record(&self.events, "rename");
        self.renamed
            .lock()
            .unwrap()
            .push((from.to_path_buf(), to.to_path_buf()));
        self.check(Fault::Rename)?;
        self.inner.rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        record(&self.events, "remove");
        self.removed.lock().unwrap().push(path.to_path_buf());
        self.check(Fault::Remove)?;
        self.inner.remove(path)
    }

    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        self.check(Fault::ReadDir)?;
        self.inner.read_dir(dir)
    }
}

/// Stat provider with per-path overrides.
#[derive(Default)]
pub struct FakeStat {
    devices: HashMap<PathBuf, u64>,
    failing: HashSet<PathBuf>,
    /// Paths queried, in order.
    pub queried: Mutex<Vec<PathBuf>>,
}

impl FakeStat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(mut self, path: impl Into<PathBuf>, dev: u64) -> Self {
        self.devices.insert(path.into(), dev);
        self
    }

    pub fn failing(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }
}

impl StatProvider for FakeStat {
    fn device_id(&self, path: &Path) -> io::Result<DeviceId> {
        self.queried.lock().unwrap().push(path.to_path_buf());
        if self.failing.contains(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "injected stat failure"));
        }
        match self.devices.get(path) {
            Some(dev) => Ok(DeviceId::from_number(*dev)),
            None => OsStat.device_id(path),
        }
    }
}

/// Reader that yields `ok_bytes` bytes of 'x' and then fails.
pub struct FailingReader {
    remaining: usize,
}

impl FailingReader {
    pub fn new(ok_bytes: usize) -> Self {
        Self { remaining: ok_bytes }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::other("source went away"));
        }
        let n = self.remaining.min(buf.len());
        buf[..n].fill(b'x');
        self.remaining -= n;
        Ok(n)
    }
}

/// Writer staging into `dir`, backed by the given providers.
pub fn writer_with(
    dir: &Path,
    mode: u32,
    fs_: Arc<dyn FileSystem>,
    stat: Arc<dyn StatProvider>,
) -> FileWriter {
    FileWriter::with_providers(WriterOptions::default().staging_dir(dir).mode(mode), fs_, stat)
}

/// Staging files for `base` (default suffix) still present in `dir`.
pub fn staging_leftovers(dir: &Path, base: &str) -> Vec<PathBuf> {
    let prefix = format!("{base}.tmp");
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
        .map(|e| e.path())
        .collect();
    found.sort();
    found
}
