//! Configuration, cache and export paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/runtime-console/`, `~/.cache/runtime-console/`
//! - macOS: `~/Library/Application Support/runtime-console/`, `~/Library/Caches/runtime-console/`
//! - Windows: `%APPDATA%\runtime-console\`, `%LOCALAPPDATA%\runtime-console\`

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "runtime-console";

/// Platform config directory for this app
///
/// Only searched for a config file, so it is never created.
pub fn platform_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME))
}

/// Get the application cache directory, creating it if needed
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
    Ok(dir)
}

/// Default directory for history exports
pub fn default_export_dir() -> Result<PathBuf> {
    let dir = cache_dir()?.join("exports");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    Ok(dir)
}

/// File name for an export taken at `at`, e.g. `console-20260102-030405.log`
pub fn export_file_name(at: DateTime<Local>) -> String {
    format!("console-{}.log", at.format("%Y%m%d-%H%M%S"))
}

/// Full path of an export file inside `dir`
pub fn export_file_path(dir: &Path, at: DateTime<Local>) -> PathBuf {
    dir.join(export_file_name(at))
}
