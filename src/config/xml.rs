//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a template config through the library's own atomic writer.
//!
//! Notes:
//! - A missing file means "use defaults"; a malformed file or an unknown field is an error.
//! - Empty elements are treated as unset.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::default_config_path;
use super::types::{AppConfig, LogLevel, parse_mode};
use crate::fs_ops::{FileWriter, WriterOptions, io_error_with_help};
use crate::platform::set_dir_mode_0700;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "staging_dir")]
    staging_dir: Option<String>,
    #[serde(rename = "temp_suffix")]
    temp_suffix: Option<String>,
    #[serde(rename = "mode")]
    mode: Option<String>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
}

const TEMPLATE: &str = "<config>
  <staging_dir></staging_dir>
  <temp_suffix>tmp</temp_suffix>
  <mode>0600</mode>
  <log_level>normal</log_level>
  <log_file></log_file>
</config>
";

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse a config file at an explicit path.
pub fn load_config_from_xml_path(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path).map_err(io_error_with_help("read config", path))?;
    let parsed: XmlConfig = from_xml_str(&content)
        .with_context(|| format!("parse config {}", path.display()))?;

    let mode = non_empty(parsed.mode)
        .map(|m| parse_mode(&m))
        .transpose()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("<mode> in {}", path.display()))?;

    let log_level = match non_empty(parsed.log_level) {
        Some(l) => l
            .parse::<LogLevel>()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("<log_level> in {}", path.display()))?,
        None => LogLevel::default(),
    };

    Ok(AppConfig {
        staging_dir: non_empty(parsed.staging_dir).map(PathBuf::from),
        temp_suffix: non_empty(parsed.temp_suffix),
        mode,
        log_level,
        log_file: non_empty(parsed.log_file).map(PathBuf::from),
    })
}

/// Load config from $ATOMICFS_CONFIG or the default location; defaults if absent.
pub fn load_config() -> Result<AppConfig> {
    let Ok(path) = default_config_path() else {
        debug!("no config location available; using defaults");
        return Ok(AppConfig::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(AppConfig::default());
    }
    load_config_from_xml_path(&path)
}

/// Write a template config at `path` (mode 0600).
///
/// Fails if `path` already exists when called. The check and the final rename are
/// not one step: a file created at `path` in between is replaced by the template.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("config file already exists: {}", path.display());
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.exists() {
        fs::create_dir_all(&parent).map_err(io_error_with_help("create config directory", &parent))?;
        // Best-effort: ignore permission-setting errors so creation still succeeds on weird filesystems.
        let _ = set_dir_mode_0700(&parent);
    }

    // Staging next to the config guarantees a same-device rename.
    let writer = FileWriter::new(WriterOptions::default().staging_dir(&parent).mode(0o600));
    writer
        .write_bytes(TEMPLATE, path)
        .with_context(|| format!("write template config {}", path.display()))?;
    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn template_round_trips_through_loader() {
        let td = tempdir().unwrap();
        let path = td.path().join("nested").join("config.xml");
        create_template_config(&path).unwrap();

        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.staging_dir, None);
        assert_eq!(cfg.temp_suffix.as_deref(), Some("tmp"));
        assert_eq!(cfg.mode, Some(0o600));
        assert_eq!(cfg.log_level, LogLevel::Normal);
        assert_eq!(cfg.log_file, None);
    }

    #[test]
    fn template_refuses_to_overwrite() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config/>").unwrap();
        let err = create_template_config(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"), "{err}");
        assert_eq!(fs::read_to_string(&path).unwrap(), "<config/>");
    }

    #[test]
    fn bad_mode_is_an_error() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><mode>rwx</mode></config>").unwrap();
        let err = load_config_from_xml_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid mode"), "{err:#}");
    }
}
