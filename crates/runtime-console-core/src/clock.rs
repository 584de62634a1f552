use crate::entry::Timestamp;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Time source shared by the console and its producer handles
#[derive(Debug, Clone)]
pub(crate) struct Clock {
    started: Instant,
    frame: Arc<AtomicU64>,
}

impl Clock {
    pub(crate) fn new() -> Self {
        Self {
            started: Instant::now(),
            frame: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn now(&self) -> Timestamp {
        Timestamp {
            wall_clock: chrono::Local::now(),
            monotonic_secs: self.started.elapsed().as_secs_f64(),
            frame: self.frame(),
        }
    }

    pub(crate) fn frame(&self) -> u64 {
        self.frame.load(Ordering::Relaxed)
    }

    /// Only the consumer tick advances the frame counter
    pub(crate) fn advance_frame(&self) -> u64 {
        self.frame.fetch_add(1, Ordering::Relaxed) + 1
    }
}
