//! Plain-text rendering of the console state

use runtime_console_core::{LogConsole, LogEntry, SeverityCounts, Timestamp, TickReport};
use std::fmt::Write;

/// Format one display row
pub fn format_row(entry: &LogEntry, timestamp: Option<&Timestamp>, collapsed: bool) -> String {
    let mut row = String::new();
    if let Some(ts) = timestamp {
        let _ = write!(row, "{} ", ts.wall_clock.format("%H:%M:%S%.3f"));
    }
    let severity: &'static str = entry.severity().into();
    let _ = write!(row, "[{:<9}] ", severity);
    // Only the first line of multi-line messages fits a row
    row.push_str(entry.message().lines().next().unwrap_or_default());
    if collapsed && entry.repeat_count() > 1 {
        let _ = write!(row, " (x{})", entry.repeat_count());
    }
    row
}

pub fn format_totals(totals: SeverityCounts) -> String {
    format!(
        "info: {}  warnings: {}  errors: {}",
        totals.info, totals.warning, totals.error
    )
}

/// Rows appended by the last tick
///
/// Appended rows sit at the tail of the display; retention only trims the head.
pub fn appended_rows(console: &LogConsole, report: &TickReport) -> Vec<String> {
    let display = console.display();
    let collapsed = console.filter().collapsed;
    let start = display.len().saturating_sub(report.displayed);
    (start..display.len())
        .filter_map(|i| {
            display
                .get(i)
                .map(|entry| format_row(entry, display.timestamp(i), collapsed))
        })
        .collect()
}

/// Every row of the current display
pub fn all_rows(console: &LogConsole) -> Vec<String> {
    let display = console.display();
    let collapsed = console.filter().collapsed;
    (0..display.len())
        .filter_map(|i| {
            display
                .get(i)
                .map(|entry| format_row(entry, display.timestamp(i), collapsed))
        })
        .collect()
}
