//! Bridge from the `log` facade into the console
//!
//! [`ConsoleLogger`] turns every `log` record into a console submission and
//! can forward the same record to a second logger (e.g. a file sink).

use crate::engine::ConsoleHandle;
use crate::severity::Severity;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Records from this crate are never captured, or the console's own
/// diagnostics would feed back into it on every tick.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// `log::Log` implementation feeding a [`ConsoleHandle`]
pub struct ConsoleLogger {
    handle: ConsoleHandle,
    level: LevelFilter,
    forward: Option<Box<dyn Log>>,
}

impl ConsoleLogger {
    pub fn new(handle: ConsoleHandle, level: LevelFilter) -> Self {
        Self {
            handle,
            level,
            forward: None,
        }
    }

    /// Also pass every record to `logger`
    pub fn with_forward(mut self, logger: Box<dyn Log>) -> Self {
        self.forward = Some(logger);
        self
    }

    /// Install as the global logger
    pub fn init(self) -> Result<(), SetLoggerError> {
        let level = self.max_level();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    /// Most verbose level either this logger or the forward target wants
    fn max_level(&self) -> LevelFilter {
        // The forward logger filters on its own; let everything reach it
        if self.forward.is_some() {
            LevelFilter::Trace
        } else {
            self.level
        }
    }

    fn captures(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && !is_own_target(metadata.target())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.captures(metadata)
            || self
                .forward
                .as_ref()
                .is_some_and(|forward| forward.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        if self.captures(record.metadata()) {
            self.handle.submit(
                record.args().to_string(),
                record_context(record),
                severity_for(record.level()),
            );
        }
        if let Some(forward) = &self.forward {
            forward.log(record);
        }
    }

    fn flush(&self) {
        if let Some(forward) = &self.forward {
            forward.flush();
        }
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Map a `log` level onto a console severity
pub fn severity_for(level: Level) -> Severity {
    match level {
        Level::Error => Severity::Error,
        Level::Warn => Severity::Warning,
        Level::Info | Level::Debug | Level::Trace => Severity::Info,
    }
}

fn record_context(record: &Record) -> String {
    match (record.file(), record.line()) {
        (Some(file), Some(line)) => format!("{} ({}:{})", record.target(), file, line),
        (Some(file), None) => format!("{} ({})", record.target(), file),
        _ => record.target().to_string(),
    }
}
