//! Core library for `atomicfs`.
//!
//! All-or-nothing file replacement: content is staged into a uniquely named file,
//! fsynced, renamed over the destination and the destination directory is fsynced.
//! If anything fails before the rename, the destination is untouched and the staging
//! file is removed.
//!
//! ```no_run
//! use atomicfs::{FileWriter, WriterOptions};
//!
//! let writer = FileWriter::new(WriterOptions::default().staging_dir("/var/lib/app").mode(0o600));
//! writer.write_bytes(b"{\"version\":2}", "/var/lib/app/state.json")?;
//! # Ok::<(), atomicfs::WriteError>(())
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod shutdown;

pub use config::{
    AppConfig, LogLevel, default_config_path, default_log_path, load_config, load_config_from_xml_path,
    parse_mode, path_has_symlink_ancestor,
};
pub use errors::{DirRole, ErrorKind, WriteError};
pub use fs_ops::{
    DEFAULT_MODE, DeviceId, DirEntryInfo, FileHandle, FileSystem, FileWriter, StatProvider, SweepReport, WriteConfig,
    WriteOutcome, WriterOptions,
};
pub use platform::{OsFileSystem, OsStat};
