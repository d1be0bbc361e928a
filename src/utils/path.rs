//! Path helpers for config-relative locations and output naming.

use std::path::{Path, PathBuf};

/// Resolves `value` against `base` unless it is already absolute.
///
/// Config files refer to prompts, key files and data roots relative to the
/// directory the config lives in, not the process working directory.
pub fn resolve_relative(base: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        base.join(value)
    }
}

/// Directory a config file's relative paths are resolved against.
pub fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// File stem as UTF-8, lossily.
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name as UTF-8, lossily.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
