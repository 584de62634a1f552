//! Application configuration
//!
//! Configuration loaded from `.runtime-console.toml`. The `[console]` table
//! holds the engine settings, everything else configures the host.

use anyhow::{Context, Result};
use log::LevelFilter;
use runtime_console_core::ConsoleConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from `.runtime-console.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Engine settings
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Level captured into the console (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where exports are written; the cache directory when unset
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Delay between two ticks
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_interval_ms() -> u64 {
    16 // ~60 frames per second
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            log_level: default_log_level(),
            export_dir: None,
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, then the platform
    /// config directory, or use defaults
    pub fn load() -> Self {
        if let Some((path, content)) = crate::load_config_file() {
            match Self::from_toml(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to load config file {}: {:#}", path.display(), e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse and validate TOML config content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config")?;
        config
            .console
            .validate()
            .context("Invalid [console] settings")?;
        Ok(config)
    }

    /// Parsed `log_level`, falling back to `Info` for unknown values
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            log::warn!("Unknown log level '{}', using info", self.log_level);
            LevelFilter::Info
        })
    }

    /// Configured export directory, or the default one under the cache dir
    pub fn export_dir(&self) -> Result<PathBuf> {
        match &self.export_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create export directory {}", dir.display())
                })?;
                Ok(dir.clone())
            }
            None => crate::paths::default_export_dir(),
        }
    }
}
