//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths and detects symlinked ancestors for safety.

use anyhow::{Result, anyhow};
use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ATOMICFS_CONFIG";

/// Config file path: $ATOMICFS_CONFIG if set and non-empty, else the OS config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    if let Some(mut base) = config_dir() {
        base.push("atomicfs");
        base.push("config.xml");
        return Ok(base);
    }
    env::var_os("HOME")
        .map(|h| PathBuf::from(h).join(".config").join("atomicfs").join("config.xml"))
        .ok_or_else(|| anyhow!("cannot determine a config directory (no config dir and HOME unset)"))
}

/// OS-appropriate default log file path (data dir). Does not create anything.
pub fn default_log_path() -> Result<PathBuf> {
    if let Some(mut base) = data_dir() {
        base.push("atomicfs");
        base.push("atomicfs.log");
        return Ok(base);
    }
    env::var_os("HOME")
        .map(|h| {
            PathBuf::from(h)
                .join(".local")
                .join("share")
                .join("atomicfs")
                .join("atomicfs.log")
        })
        .ok_or_else(|| anyhow!("cannot determine a data directory (no data dir and HOME unset)"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
