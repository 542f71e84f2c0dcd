use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::TEMP_RAND_LEN;

/// Split a destination into (containing directory, file name).
/// A bare file name lives in ".". Returns None when there is no final component
/// (e.g. "/" or "dir/..").
pub(super) fn split_destination(destination: &Path) -> Option<(PathBuf, &OsStr)> {
    let name = destination.file_name()?;
    let dir = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, name))
}

/// Staging name prefix: "<base>.<suffix>"; the provider appends a random tail.
pub(super) fn temp_prefix(base_name: &OsStr, suffix: &str) -> OsString {
    let mut prefix = base_name.to_os_string();
    prefix.push(".");
    prefix.push(suffix);
    prefix
}

/// True if `name` looks like "<base>.<suffix>XXXXXX" with an alphanumeric random tail.
pub(super) fn is_staging_name(name: &OsStr, suffix: &str) -> bool {
    let bytes = name.as_encoded_bytes();
    let marker = format!(".{suffix}");
    if bytes.len() <= marker.len() + TEMP_RAND_LEN {
        return false;
    }
    let (head, tail) = bytes.split_at(bytes.len() - TEMP_RAND_LEN);
    tail.iter().all(u8::is_ascii_alphanumeric) && head.ends_with(marker.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_lives_in_current_dir() {
        let (dir, name) = split_destination(Path::new("out.txt")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, OsStr::new("out.txt"));
    }

    #[test]
    fn nested_destination_splits_on_parent() {
        let (dir, name) = split_destination(Path::new("/var/lib/app/state.json")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/lib/app"));
        assert_eq!(name, OsStr::new("state.json"));
    }

    #[test]
    fn root_and_dotdot_have_no_file_name() {
        assert!(split_destination(Path::new("/")).is_none());
        assert!(split_destination(Path::new("dir/..")).is_none());
    }

    #[test]
    fn prefix_joins_base_and_suffix() {
        assert_eq!(temp_prefix(OsStr::new("out.txt"), "tmp"), OsString::from("out.txt.tmp"));
    }

    #[test]
    fn staging_name_matching() {
        assert!(is_staging_name(OsStr::new("out.txt.tmpA1b2C3"), "tmp"));
        assert!(is_staging_name(OsStr::new("x.partaaaaaa"), "part"));
        // wrong suffix, short tail, punctuation in tail, missing base
        assert!(!is_staging_name(OsStr::new("out.txt.tmpA1b2C3"), "part"));
        assert!(!is_staging_name(OsStr::new("out.txt.tmpA1b2"), "tmp"));
        assert!(!is_staging_name(OsStr::new("out.txt.tmpA1-2C3"), "tmp"));
        assert!(!is_staging_name(OsStr::new(".tmpA1b2C3"), "tmp"));
        assert!(!is_staging_name(OsStr::new("out.txt"), "tmp"));
    }
}
