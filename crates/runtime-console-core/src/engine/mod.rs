//! The log console engine
//!
//! [`LogConsole`] ties the pieces together. Producers submit through a
//! [`ConsoleHandle`]; the host calls [`LogConsole::tick`] once per frame to
//! drain the queue, fold duplicates, patch the display view and enforce
//! retention.
//!
//! ```
//! use runtime_console_core::{ConsoleConfig, LogConsole, Severity};
//!
//! let mut console = LogConsole::new(ConsoleConfig::default())?;
//! let handle = console.handle();
//!
//! std::thread::spawn(move || {
//!     handle.submit("worker started", "", Severity::Info);
//! })
//! .join()
//! .unwrap();
//!
//! console.submit("worker started", "", Severity::Info);
//! console.set_collapsed(true);
//! console.tick();
//!
//! let display = console.display();
//! assert_eq!(display.len(), 1);
//! assert_eq!(display.get(0).unwrap().repeat_count(), 2);
//! # Ok::<(), runtime_console_core::ConsoleError>(())
//! ```

mod display;
mod handle;
mod retention;

pub use display::DisplayRef;
pub use handle::ConsoleHandle;

use crate::clock::Clock;
use crate::config::ConsoleConfig;
use crate::entry::{EntryId, LogEntry, QueuedLogEntry, Timestamp};
use crate::error::ConsoleError;
use crate::export::ExportRecord;
use crate::filter::{LogFilter, SearchQuery};
use crate::queue::IngestionQueue;
use crate::registry::LogRegistry;
use crate::ring_buffer::RingBuffer;
use crate::severity::{Severity, SeverityCounts, SeverityMask};
use display::DisplayView;
use std::sync::Arc;

/// Outcome of one [`LogConsole::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Entries taken from the ingestion queue
    pub drained: usize,
    /// Rows appended to the display view
    pub displayed: usize,
    /// History entries removed by retention
    pub evicted: usize,
    /// Whether a renderer needs to refresh (new rows, repeat counts, evictions)
    pub display_changed: bool,
    /// Entries still queued after this tick
    pub pending: usize,
}

/// What ingesting one arrival did to the display view
enum DisplayUpdate {
    Unchanged,
    Appended,
    /// A collapsed row's repeat count (and timestamp) changed in place
    Updated,
}

/// In-process log console: ingestion, deduplication, retention and display
#[derive(Debug)]
pub struct LogConsole {
    config: ConsoleConfig,
    handle: ConsoleHandle,
    registry: LogRegistry,
    /// Every arrival in order, duplicates included
    history: RingBuffer<EntryId>,
    history_timestamps: Option<RingBuffer<Timestamp>>,
    display: DisplayView,
    filter: LogFilter,
    /// Per-category counts over the history
    totals: SeverityCounts,
    visible: bool,
    /// Reused between ticks to avoid reallocating the drain buffer
    scratch: Vec<QueuedLogEntry>,
}

impl LogConsole {
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        config.validate()?;

        let track_timestamps = config.capture_timestamps;
        let handle = ConsoleHandle::new(
            Arc::new(IngestionQueue::new(config.queue_capacity)),
            Clock::new(),
            track_timestamps,
            config.capture_mask,
            config.max_message_len,
        );

        log::debug!(
            "Creating log console (history cap {}, batch {}, queue {}, timestamps {})",
            config.history_cap,
            config.eviction_batch,
            config.queue_capacity,
            track_timestamps
        );

        Ok(Self {
            registry: LogRegistry::new(config.pool_cap, track_timestamps),
            history: RingBuffer::new(),
            history_timestamps: track_timestamps.then(RingBuffer::new),
            display: DisplayView::new(track_timestamps),
            filter: LogFilter::new(config.start_collapsed, config.search_context),
            totals: SeverityCounts::default(),
            visible: config.start_visible,
            scratch: Vec::new(),
            handle,
            config,
        })
    }

    /// Producer handle that can be moved to other threads
    pub fn handle(&self) -> ConsoleHandle {
        self.handle.clone()
    }

    /// Queue a log event; see [`ConsoleHandle::submit`]
    pub fn submit(
        &self,
        message: impl Into<String>,
        context: impl Into<String>,
        severity: Severity,
    ) -> bool {
        self.handle.submit(message, context, severity)
    }

    /// Process queued arrivals
    ///
    /// Drains everything while visible, or at most `hidden_drain_limit`
    /// entries while hidden.
    pub fn tick(&mut self) -> TickReport {
        let limit = if self.visible {
            usize::MAX
        } else {
            self.config.hidden_drain_limit.unwrap_or(usize::MAX)
        };

        let mut scratch = std::mem::take(&mut self.scratch);
        let drained_counts = self.handle.queue().drain_into(&mut scratch, limit);
        self.totals.merge(drained_counts);

        let mut report = TickReport {
            drained: scratch.len(),
            ..TickReport::default()
        };

        for raw in scratch.drain(..) {
            match self.ingest(raw) {
                DisplayUpdate::Appended => {
                    report.displayed += 1;
                    report.display_changed = true;
                }
                DisplayUpdate::Updated => report.display_changed = true,
                DisplayUpdate::Unchanged => {}
            }

            if self.history.len() > self.config.history_cap {
                report.evicted += self.enforce_retention();
                report.display_changed = true;
            }
        }
        self.scratch = scratch;

        self.handle.clock().advance_frame();
        report.pending = self.handle.queue().len();
        report
    }

    /// Fold one arrival into the registry, history and display
    fn ingest(&mut self, mut raw: QueuedLogEntry) -> DisplayUpdate {
        if self.history_timestamps.is_some() && raw.timestamp.is_none() {
            raw.timestamp = Some(self.handle.clock().now());
        }
        let timestamp = raw.timestamp;

        let (id, was_new) = self.registry.intern_or_bump(&raw);
        self.history.push(id);
        if let Some(timestamps) = self.history_timestamps.as_mut() {
            timestamps.push(timestamp.expect("timestamp stamped above"));
        }

        let entry = self.registry.get(id);
        if !self.filter.matches(entry) {
            return DisplayUpdate::Unchanged;
        }

        if !self.filter.collapsed {
            self.display.push(id, timestamp);
            return DisplayUpdate::Appended;
        }

        if was_new {
            self.display.push(id, timestamp);
            return DisplayUpdate::Appended;
        }

        // The repeat count lives on the shared entry; only the shown
        // timestamp has to follow the latest arrival.
        if let Some(ts) = timestamp {
            let collapsed_index = entry.collapsed_index();
            if let Some(position) = self
                .display
                .position_of_collapsed(&self.registry, collapsed_index)
            {
                if let Some(timestamps) = self.display.timestamps.as_mut() {
                    timestamps[position] = ts;
                }
            }
        }
        DisplayUpdate::Updated
    }

    /// Show only the given severity categories
    pub fn set_severity_filter(&mut self, mask: SeverityMask) {
        self.filter.mask = mask;
        self.rebuild_display();
    }

    /// Switch between one row per unique entry and one row per arrival
    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.filter.collapsed = collapsed;
        self.rebuild_display();
    }

    /// Filter by case-insensitive substring; an empty term clears the search
    pub fn set_search_term(&mut self, term: &str) {
        self.filter.search = SearchQuery::substring(term);
        self.rebuild_display();
    }

    /// Filter by case-insensitive regular expression
    ///
    /// On error the current search stays active and the display is untouched.
    pub fn set_search_regex(&mut self, pattern: &str) -> Result<(), ConsoleError> {
        self.filter.search = SearchQuery::regex(pattern)?;
        self.rebuild_display();
        Ok(())
    }

    /// Select the drain mode used by [`tick`](Self::tick)
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Recompute the display view from scratch for the current filter
    fn rebuild_display(&mut self) {
        self.display.clear();
        if self.filter.is_match_nothing() {
            log::debug!("Display rebuilt: filter matches nothing");
            return;
        }

        let (source, source_timestamps) = if self.filter.collapsed {
            (self.registry.ids(), self.registry.timestamps())
        } else {
            (&self.history, self.history_timestamps.as_ref())
        };

        if self.filter.is_match_all() {
            self.display.ids.extend(source.iter().copied());
            if let (Some(timestamps), Some(source)) =
                (self.display.timestamps.as_mut(), source_timestamps)
            {
                timestamps.extend(source.iter().copied());
            }
        } else {
            for (index, &id) in source.iter().enumerate() {
                if self.filter.matches(self.registry.get(id)) {
                    let timestamp = source_timestamps.map(|timestamps| timestamps[index]);
                    self.display.push(id, timestamp);
                }
            }
        }

        log::debug!(
            "Display rebuilt: {} of {} entries shown (collapsed: {})",
            self.display.ids.len(),
            source.len(),
            self.filter.collapsed
        );
    }

    /// Empty every view and the queue, releasing all entries to the pool
    pub fn clear_all(&mut self) {
        self.handle.queue().clear();
        self.display.clear();
        self.history.clear();
        if let Some(timestamps) = self.history_timestamps.as_mut() {
            timestamps.clear();
        }
        self.registry.clear();
        self.totals = SeverityCounts::default();
        log::debug!("Log console cleared");
    }

    /// One export record per history entry, oldest first
    pub fn export_records(&self) -> Vec<ExportRecord> {
        self.history
            .iter()
            .enumerate()
            .map(|(index, &id)| {
                let timestamp = self
                    .history_timestamps
                    .as_ref()
                    .map(|timestamps| &timestamps[index]);
                ExportRecord::new(self.registry.get(id), timestamp)
            })
            .collect()
    }

    /// The full history as newline-delimited text, one line per arrival
    pub fn export_all(&self) -> String {
        let mut out = String::new();
        for record in self.export_records() {
            out.push_str(&record.to_line());
            out.push('\n');
        }
        out
    }

    /// The full history as JSON lines
    pub fn export_json_lines(&self) -> Result<String, ConsoleError> {
        let mut out = String::new();
        for record in self.export_records() {
            out.push_str(&serde_json::to_string(&record)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Entries currently selected for display
    pub fn display(&self) -> DisplayRef<'_> {
        DisplayRef::new(&self.display, &self.registry)
    }

    pub fn entry(&self, id: EntryId) -> &LogEntry {
        self.registry.get(id)
    }

    /// Unique entries in first-occurrence order
    pub fn registry(&self) -> &LogRegistry {
        &self.registry
    }

    /// Every arrival still retained, oldest first
    pub fn history(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.history.iter().map(|&id| self.registry.get(id))
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    pub fn queue_len(&self) -> usize {
        self.handle.queue().len()
    }

    /// Per-category counts over the retained history
    pub fn totals(&self) -> SeverityCounts {
        self.totals
    }

    /// Per-category counts of entries waiting for the next tick
    pub fn pending_counts(&self) -> SeverityCounts {
        self.handle.queue().pending_counts()
    }

    /// Entries lost to the queue's drop-oldest policy since the last clear
    pub fn dropped(&self) -> u64 {
        self.handle.queue().dropped()
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    /// Number of completed ticks
    pub fn frame(&self) -> u64 {
        self.handle.clock().frame()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Audit every cross-view invariant
    ///
    /// Meant for tests and debugging; runs in O(n).
    ///
    /// # Panics
    ///
    /// Panics on the first violated invariant.
    pub fn assert_consistent(&self) {
        self.registry.assert_consistent();

        assert!(
            self.history.len() <= self.config.history_cap,
            "history exceeds its cap"
        );

        let repeat_sum: usize = self
            .registry
            .iter()
            .map(|entry| entry.repeat_count() as usize)
            .sum();
        assert_eq!(
            repeat_sum,
            self.history.len(),
            "repeat counts do not add up to the history length"
        );

        let mut totals = SeverityCounts::default();
        for entry in self.history() {
            totals.increment(entry.severity());
        }
        assert_eq!(totals, self.totals, "severity totals out of sync");

        if let Some(timestamps) = &self.history_timestamps {
            assert_eq!(timestamps.len(), self.history.len(), "history timestamps out of sync");
        }
        if let Some(timestamps) = &self.display.timestamps {
            assert_eq!(timestamps.len(), self.display.ids.len(), "display timestamps out of sync");
        }

        let source = if self.filter.collapsed {
            self.registry.ids()
        } else {
            &self.history
        };
        let expected: Vec<EntryId> = if self.filter.is_match_nothing() {
            Vec::new()
        } else {
            source
                .iter()
                .copied()
                .filter(|&id| self.filter.matches(self.registry.get(id)))
                .collect()
        };
        let actual: Vec<EntryId> = self.display.ids.iter().copied().collect();
        assert_eq!(actual, expected, "display is not the filtered source");
    }
}
