//! Logging setup
//!
//! Every `log` record is captured into the console and also written to a
//! file via simplelog. Log file location depends on build type:
//! - Debug builds: current working directory (for development convenience)
//! - Release builds: cache directory (~/.cache/runtime-console/ on Linux)

use anyhow::{Context, Result};
use runtime_console_core::{ConsoleHandle, ConsoleLogger};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

/// Get the log file path based on build type
fn log_file_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let filename = format!("runtime-console-{}.log", timestamp);

    if cfg!(debug_assertions) {
        PathBuf::from(filename)
    } else {
        runtime_console_config::paths::cache_dir()
            .map(|dir| dir.join(&filename))
            .unwrap_or_else(|_| PathBuf::from(filename))
    }
}

/// File log level from `RUST_LOG`, debug when unset
fn file_level() -> LevelFilter {
    std::env::var("RUST_LOG")
        .map(|v| match v.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        })
        .unwrap_or(LevelFilter::Debug)
}

/// Install the console capture with the file sink behind it
///
/// `capture_level` limits what reaches the console; the file receives
/// whatever `RUST_LOG` asks for. Returns the path of the log file.
pub fn init(handle: ConsoleHandle, capture_level: LevelFilter) -> Result<PathBuf> {
    let log_file = log_file_path();

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    ConsoleLogger::new(handle, capture_level)
        .with_forward(WriteLogger::new(file_level(), config, file))
        .init()
        .context("Failed to initialize logger")?;

    Ok(log_file)
}
