//! Platform configuration paths
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/petstore-harness/`
//! - macOS: `~/Library/Application Support/petstore-harness/`
//! - Windows: `%APPDATA%\petstore-harness\`

use std::path::PathBuf;

/// Application name used for config directories
const APP_NAME: &str = "petstore-harness";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the default configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
