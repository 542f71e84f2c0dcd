//! Filesystem operations: the atomic write protocol, modularized.
//!
//! - `device`: same-device precondition
//! - `stage`: durable staging file
//! - `atomic`: rename + directory sync
//! - `rollback`: best-effort staging cleanup
//! - `sweep`: removal of staging files orphaned by crashes

mod atomic;
mod device;
mod helpers;
mod options;
mod provider;
mod rollback;
mod stage;
mod sweep;
mod util;
mod writer;

pub use helpers::{describe_error, io_error_with_help, io_hint};
pub use options::{DEFAULT_MODE, DEFAULT_TEMP_SUFFIX, WriteConfig, WriterOptions};
pub use provider::{DeviceId, DirEntryInfo, FileHandle, FileSystem, StatProvider};
pub use sweep::SweepReport;
pub use writer::{FileWriter, WriteOutcome};

/// Length of the random tail appended to staging file names.
pub const TEMP_RAND_LEN: usize = 6;
