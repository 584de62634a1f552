//! Runtime Console Core
//!
//! In-process log ingestion engine for an interactive runtime console.
//! Log events arrive from any number of threads, are deduplicated into
//! canonical entries, retained in a bounded history and presented through a
//! filtered, searchable display view that a single consumer refreshes once
//! per frame.
//!
//! # Example
//!
//! ```
//! use runtime_console_core::{ConsoleConfig, LogConsole, Severity, SeverityMask};
//!
//! let mut console = LogConsole::new(ConsoleConfig::default())?;
//!
//! console.submit("connected", "", Severity::Info);
//! console.submit("retrying", "net::client", Severity::Warning);
//! console.submit("retrying", "net::client", Severity::Warning);
//! console.tick();
//!
//! assert_eq!(console.history_len(), 3);
//! assert_eq!(console.registry_len(), 2);
//!
//! console.set_severity_filter(SeverityMask::WARNING);
//! assert_eq!(console.display().messages(), vec!["retrying", "retrying"]);
//! # Ok::<(), runtime_console_core::ConsoleError>(())
//! ```

mod clock;
mod engine;
mod entry;
mod error;
mod filter;
mod queue;
mod registry;
mod severity;

pub mod capture;
pub mod config;
pub mod export;
pub mod ring_buffer;

pub use capture::ConsoleLogger;
pub use config::ConsoleConfig;
pub use engine::{ConsoleHandle, DisplayRef, LogConsole, TickReport};
pub use entry::{EntryId, LogEntry, QueuedLogEntry, Timestamp};
pub use error::ConsoleError;
pub use export::ExportRecord;
pub use filter::{LogFilter, SearchQuery};
pub use queue::IngestionQueue;
pub use registry::LogRegistry;
pub use ring_buffer::{Compaction, RingBuffer};
pub use severity::{Severity, SeverityCounts, SeverityMask};
