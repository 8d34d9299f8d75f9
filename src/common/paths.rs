//! Platform configuration paths and feature file helpers
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/fsbdd/`
//! - macOS: `~/Library/Application Support/fsbdd/`
//! - Windows: `%APPDATA%\fsbdd\`

use std::path::{Path, PathBuf};

/// Name used for the configuration and data directories
const APP_NAME: &str = "fsbdd";

/// File extension that marks a Gherkin feature file
pub const FEATURE_EXTENSION: &str = "feature";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Whether the path names a feature file
pub fn is_feature_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(FEATURE_EXTENSION)
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
