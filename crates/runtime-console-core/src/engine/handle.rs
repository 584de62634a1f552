//! Producer-side handle

use crate::clock::Clock;
use crate::entry::QueuedLogEntry;
use crate::queue::IngestionQueue;
use crate::severity::{Severity, SeverityCounts, SeverityMask};
use std::sync::Arc;

/// Cheap, cloneable entry point for log producers on any thread
///
/// Submitting only takes the ingestion queue's lock for a push; all
/// deduplication and filtering happens later on the consumer tick.
#[derive(Debug, Clone)]
pub struct ConsoleHandle {
    queue: Arc<IngestionQueue>,
    clock: Clock,
    capture_timestamps: bool,
    capture_mask: SeverityMask,
    max_message_len: usize,
}

impl ConsoleHandle {
    pub(crate) fn new(
        queue: Arc<IngestionQueue>,
        clock: Clock,
        capture_timestamps: bool,
        capture_mask: SeverityMask,
        max_message_len: usize,
    ) -> Self {
        Self {
            queue,
            clock,
            capture_timestamps,
            capture_mask,
            max_message_len,
        }
    }

    /// Queue a log event for the next tick
    ///
    /// Returns `false` when the severity is not captured. A full queue drops
    /// its oldest entry instead of rejecting this one.
    pub fn submit(
        &self,
        message: impl Into<String>,
        context: impl Into<String>,
        severity: Severity,
    ) -> bool {
        if !self.capture_mask.accepts(severity) {
            return false;
        }

        let mut message = message.into();
        truncate_on_char_boundary(&mut message, self.max_message_len);

        let mut raw = QueuedLogEntry::new(message, context, severity);
        if self.capture_timestamps {
            raw = raw.with_timestamp(self.clock.now());
        }
        self.queue.enqueue(raw);
        true
    }

    /// Counts of submitted entries not yet processed by a tick
    pub fn pending_counts(&self) -> SeverityCounts {
        self.queue.pending_counts()
    }

    pub(crate) fn queue(&self) -> &IngestionQueue {
        &self.queue
    }

    pub(crate) fn clock(&self) -> &Clock {
        &self.clock
    }
}

/// Cut `text` to at most `max_len` bytes without splitting a character
fn truncate_on_char_boundary(text: &mut String, max_len: usize) {
    if text.len() <= max_len {
        return;
    }
    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_on_char_boundary() {
        let mut ascii = "hello world".to_string();
        truncate_on_char_boundary(&mut ascii, 5);
        assert_eq!(ascii, "hello");

        // 'é' is two bytes; cutting inside it backs off to the boundary
        let mut accented = "café".to_string();
        truncate_on_char_boundary(&mut accented, 4);
        assert_eq!(accented, "caf");

        let mut short = "ok".to_string();
        truncate_on_char_boundary(&mut short, 10);
        assert_eq!(short, "ok");
    }

    #[test]
    fn test_capture_mask_filters_on_submit() {
        let queue = Arc::new(IngestionQueue::new(8));
        let handle = ConsoleHandle::new(
            Arc::clone(&queue),
            Clock::new(),
            true,
            SeverityMask::WARNING | SeverityMask::ERROR,
            100,
        );

        assert!(!handle.submit("noise", "", Severity::Info));
        assert!(handle.submit("careful", "", Severity::Warning));
        assert!(handle.submit("boom", "", Severity::Exception));

        let pending = handle.pending_counts();
        assert_eq!(pending.info, 0);
        assert_eq!(pending.warning, 1);
        assert_eq!(pending.error, 1);

        let mut drained = Vec::new();
        queue.drain_into(&mut drained, usize::MAX);
        assert!(drained.iter().all(|raw| raw.timestamp.is_some()));
    }
}
