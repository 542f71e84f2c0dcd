//! Typed error definitions for atomicfs.
//! One variant per step of the write protocol, each carrying the offending path
//! and the underlying cause.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which directory a device lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirRole {
    Destination,
    Staging,
}

impl fmt::Display for DirRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirRole::Destination => f.write_str("destination"),
            DirRole::Staging => f.write_str("staging"),
        }
    }
}

/// Field-less discriminant of [`WriteError`], handy for matching and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidDestination,
    StatFailed,
    DeviceMismatch,
    TempCreateFailed,
    ChmodFailed,
    CopyFailed,
    SyncFailed,
    CloseFailed,
    RenameFailed,
    DirOpenFailed,
    DirSyncFailed,
    DirCloseFailed,
    SweepFailed,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("destination has no file name: {}", path.display())]
    InvalidDestination { path: PathBuf },

    #[error("unable to stat {role} directory {}: {source}", path.display())]
    StatFailed {
        role: DirRole,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "staging directory {} and destination directory {} are not on the same device",
        staging.display(),
        destination.display()
    )]
    DeviceMismatch {
        destination: PathBuf,
        staging: PathBuf,
    },

    #[error("unable to create staging file in {}: {source}", dir.display())]
    TempCreateFailed {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to chmod staging file {}: {source}", path.display())]
    ChmodFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to copy source into staging file {}: {source}", path.display())]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to fsync staging file {}: {source}", path.display())]
    SyncFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to close staging file {}: {source}", path.display())]
    CloseFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to rename staging file {} to {}: {source}", from.display(), to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to open directory {} for syncing: {source}", path.display())]
    DirOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to sync directory {}: {source}", path.display())]
    DirSyncFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to close directory {} after syncing: {source}", path.display())]
    DirCloseFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to list staging directory {}: {source}", path.display())]
    SweepFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WriteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WriteError::InvalidDestination { .. } => ErrorKind::InvalidDestination,
            WriteError::StatFailed { .. } => ErrorKind::StatFailed,
            WriteError::DeviceMismatch { .. } => ErrorKind::DeviceMismatch,
            WriteError::TempCreateFailed { .. } => ErrorKind::TempCreateFailed,
            WriteError::ChmodFailed { .. } => ErrorKind::ChmodFailed,
            WriteError::CopyFailed { .. } => ErrorKind::CopyFailed,
            WriteError::SyncFailed { .. } => ErrorKind::SyncFailed,
            WriteError::CloseFailed { .. } => ErrorKind::CloseFailed,
            WriteError::RenameFailed { .. } => ErrorKind::RenameFailed,
            WriteError::DirOpenFailed { .. } => ErrorKind::DirOpenFailed,
            WriteError::DirSyncFailed { .. } => ErrorKind::DirSyncFailed,
            WriteError::DirCloseFailed { .. } => ErrorKind::DirCloseFailed,
            WriteError::SweepFailed { .. } => ErrorKind::SweepFailed,
        }
    }

    /// True when the rename already happened: the destination holds the new
    /// content, only the durability of the directory entry is unconfirmed.
    pub fn is_committed(&self) -> bool {
        matches!(
            self,
            WriteError::DirOpenFailed { .. }
                | WriteError::DirSyncFailed { .. }
                | WriteError::DirCloseFailed { .. }
        )
    }

    /// Staging file left behind by this failure, if one still exists.
    pub fn temp_path(&self) -> Option<&Path> {
        match self {
            WriteError::ChmodFailed { path, .. }
            | WriteError::CopyFailed { path, .. }
            | WriteError::SyncFailed { path, .. }
            | WriteError::CloseFailed { path, .. } => Some(path),
            WriteError::RenameFailed { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Underlying I/O cause, if the failure came from the OS.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            WriteError::InvalidDestination { .. } | WriteError::DeviceMismatch { .. } => None,
            WriteError::StatFailed { source, .. }
            | WriteError::TempCreateFailed { source, .. }
            | WriteError::ChmodFailed { source, .. }
            | WriteError::CopyFailed { source, .. }
            | WriteError::SyncFailed { source, .. }
            | WriteError::CloseFailed { source, .. }
            | WriteError::RenameFailed { source, .. }
            | WriteError::DirOpenFailed { source, .. }
            | WriteError::DirSyncFailed { source, .. }
            | WriteError::DirCloseFailed { source, .. }
            | WriteError::SweepFailed { source, .. } => Some(source),
        }
    }

    /// Stable process exit code for the CLI.
    pub fn code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidDestination => 2,
            ErrorKind::StatFailed => 3,
            ErrorKind::DeviceMismatch => 4,
            ErrorKind::TempCreateFailed
            | ErrorKind::ChmodFailed
            | ErrorKind::CopyFailed
            | ErrorKind::SyncFailed
            | ErrorKind::CloseFailed => 5,
            ErrorKind::RenameFailed => 6,
            ErrorKind::DirOpenFailed | ErrorKind::DirSyncFailed | ErrorKind::DirCloseFailed => 7,
            ErrorKind::SweepFailed => 8,
        }
    }
}
