//! Configuration and file management for runtime-console
//!
//! This crate provides:
//! - File path utilities for config, cache and export files
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig) wrapping the engine's ConsoleConfig

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{config_file_candidates, load_config_file};
pub use runtime_console_core::ConsoleConfig;
