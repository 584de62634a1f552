//! Error types
//!
//! Capacity overflow is never an error: full queues and histories drop their
//! oldest entries silently. Only configuration and user input can fail.

use thiserror::Error;

/// Errors surfaced by the console
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Invalid console configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid search pattern '{pattern}': {source}")]
    InvalidSearchPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Malformed export line: {0}")]
    MalformedExportLine(String),

    #[error("Failed to serialize export: {0}")]
    Serialization(#[from] serde_json::Error),
}
