//! Export format for the history buffer
//!
//! Each arrival becomes one line of tab separated fields:
//!
//! ```text
//! [<timestamp>\t]<severity>\t<message>\t<context>
//! ```
//!
//! The timestamp field is only present when timestamps are captured.
//! Backslashes, tabs and line breaks inside fields are escaped, so multi-line
//! stack traces stay on one line and [`ExportRecord::parse_line`] recovers
//! the original text.

use crate::entry::{LogEntry, Timestamp};
use crate::error::ConsoleError;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const WALL_CLOCK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// One exported history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Formatted arrival time (`<wall clock>@<frame>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub context: String,
}

impl ExportRecord {
    pub fn new(entry: &LogEntry, timestamp: Option<&Timestamp>) -> Self {
        Self {
            timestamp: timestamp.map(format_timestamp),
            severity: entry.severity(),
            message: entry.message().to_string(),
            context: entry.context().to_string(),
        }
    }

    /// Render as a single export line (without trailing newline)
    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(self.message.len() + self.context.len() + 32);
        if let Some(timestamp) = &self.timestamp {
            escape_into(&mut line, timestamp);
            line.push('\t');
        }
        let severity: &'static str = self.severity.into();
        line.push_str(severity);
        line.push('\t');
        escape_into(&mut line, &self.message);
        line.push('\t');
        escape_into(&mut line, &self.context);
        line
    }

    /// Parse a line produced by [`to_line`](Self::to_line)
    pub fn parse_line(line: &str) -> Result<Self, ConsoleError> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let fields: Vec<&str> = line.split('\t').collect();
        let (timestamp, severity, message, context) = match fields.as_slice() {
            [severity, message, context] => (None, *severity, *message, *context),
            [timestamp, severity, message, context] => {
                (Some(unescape(timestamp)?), *severity, *message, *context)
            }
            _ => return Err(ConsoleError::MalformedExportLine(line.to_string())),
        };

        let severity = Severity::from_str(severity)
            .map_err(|_| ConsoleError::MalformedExportLine(line.to_string()))?;

        Ok(Self {
            timestamp,
            severity,
            message: unescape(message)?,
            context: unescape(context)?,
        })
    }
}

fn format_timestamp(timestamp: &Timestamp) -> String {
    format!(
        "{}@{}",
        timestamp.wall_clock.format(WALL_CLOCK_FORMAT),
        timestamp.frame
    )
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
}

fn unescape(text: &str) -> Result<String, ConsoleError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            _ => return Err(ConsoleError::MalformedExportLine(text.to_string())),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message: &str, context: &str) -> ExportRecord {
        ExportRecord {
            timestamp: None,
            severity: Severity::Error,
            message: message.to_string(),
            context: context.to_string(),
        }
    }

    #[test]
    fn test_line_layout() {
        let line = record("disk full", "at write()").to_line();
        assert_eq!(line, "Error\tdisk full\tat write()");
    }

    #[test]
    fn test_multiline_context_stays_on_one_line() {
        let original = record(
            "panic in\tworker",
            "frame 0: main\nframe 1: run\r\npath C:\\tmp",
        );
        let line = original.to_line();
        assert!(!line.contains('\n'));
        assert_eq!(line.matches('\t').count(), 2);

        assert_eq!(ExportRecord::parse_line(&line).unwrap(), original);
    }

    #[test]
    fn test_timestamp_field_is_optional() {
        let mut original = record("tick", "");
        original.timestamp = Some("2026-01-02T03:04:05.678@12".to_string());

        let parsed = ExportRecord::parse_line(&original.to_line()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_malformed_lines_are_rejected() {
        assert!(ExportRecord::parse_line("just text").is_err());
        assert!(ExportRecord::parse_line("Verbose\tmsg\tctx").is_err());
        assert!(ExportRecord::parse_line("Info\tbad escape \\x\t").is_err());
        assert!(ExportRecord::parse_line("a\tb\tc\td\te").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let original = record("json", "ctx");
        let json = serde_json::to_string(&original).unwrap();
        assert!(!json.contains("timestamp"));
        let parsed: ExportRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
