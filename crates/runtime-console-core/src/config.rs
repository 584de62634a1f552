//! Console configuration
//!
//! All knobs are fixed for the lifetime of a [`LogConsole`](crate::LogConsole).

use crate::error::ConsoleError;
use crate::severity::SeverityMask;
use serde::{Deserialize, Serialize};

/// Static configuration of a console session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Maximum number of entries waiting in the ingestion queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Maximum number of retained history entries
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Minimum number of entries evicted once the history exceeds
    /// `history_cap`
    #[serde(default = "default_eviction_batch")]
    pub eviction_batch: usize,

    /// Maximum number of recycled entry shells kept for reuse
    #[serde(default = "default_pool_cap")]
    pub pool_cap: usize,

    /// Record wall clock, monotonic time and frame for every arrival
    #[serde(default)]
    pub capture_timestamps: bool,

    /// Entries drained per tick while the console is hidden (`None` = all)
    #[serde(default = "default_hidden_drain_limit")]
    pub hidden_drain_limit: Option<usize>,

    #[serde(default = "default_true")]
    pub start_visible: bool,

    #[serde(default)]
    pub start_collapsed: bool,

    /// Match the search term against the context text too
    #[serde(default)]
    pub search_context: bool,

    /// Messages longer than this many bytes are truncated on submit
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,

    /// Severity categories accepted on submit; others are ignored
    #[serde(default = "SeverityMask::all")]
    pub capture_mask: SeverityMask,
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_history_cap() -> usize {
    10_000
}

fn default_eviction_batch() -> usize {
    16
}

fn default_pool_cap() -> usize {
    256
}

fn default_hidden_drain_limit() -> Option<usize> {
    Some(64)
}

fn default_max_message_len() -> usize {
    10_000
}

fn default_true() -> bool {
    true
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            history_cap: default_history_cap(),
            eviction_batch: default_eviction_batch(),
            pool_cap: default_pool_cap(),
            capture_timestamps: false,
            hidden_drain_limit: default_hidden_drain_limit(),
            start_visible: true,
            start_collapsed: false,
            search_context: false,
            max_message_len: default_max_message_len(),
            capture_mask: SeverityMask::all(),
        }
    }
}

impl ConsoleConfig {
    /// Reject settings the engine cannot operate with
    pub fn validate(&self) -> Result<(), ConsoleError> {
        if self.queue_capacity == 0 {
            return Err(ConsoleError::InvalidConfig(
                "queue_capacity must be greater than 0".to_string(),
            ));
        }
        if self.history_cap == 0 {
            return Err(ConsoleError::InvalidConfig(
                "history_cap must be greater than 0".to_string(),
            ));
        }
        if self.eviction_batch == 0 {
            return Err(ConsoleError::InvalidConfig(
                "eviction_batch must be greater than 0".to_string(),
            ));
        }
        if self.hidden_drain_limit == Some(0) {
            return Err(ConsoleError::InvalidConfig(
                "hidden_drain_limit must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Entries a retention pass removes from a history of `history_len`
    ///
    /// Zero while the history is within `history_cap`. Past it, at least
    /// `eviction_batch` entries go, so the history ends at or below the cap.
    pub fn eviction_count(&self, history_len: usize) -> usize {
        if history_len <= self.history_cap {
            return 0;
        }
        (history_len - self.history_cap)
            .max(self.eviction_batch)
            .min(history_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConsoleConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.capture_mask.is_all());
    }

    #[test]
    fn test_eviction_count_never_leaves_history_above_cap() {
        let config = ConsoleConfig {
            history_cap: 50,
            eviction_batch: 10,
            ..ConsoleConfig::default()
        };
        assert_eq!(config.eviction_count(50), 0);
        assert_eq!(config.eviction_count(51), 10);
        assert_eq!(config.eviction_count(55), 10);
        assert_eq!(config.eviction_count(75), 25);

        // A batch larger than the history empties it
        let tiny = ConsoleConfig {
            history_cap: 1,
            eviction_batch: 10,
            ..ConsoleConfig::default()
        };
        assert_eq!(tiny.eviction_count(2), 2);
    }

    #[test]
    fn test_zero_capacities_are_rejected() {
        let config = ConsoleConfig {
            queue_capacity: 0,
            ..ConsoleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConsoleError::InvalidConfig(_))
        ));

        let config = ConsoleConfig {
            eviction_batch: 0,
            ..ConsoleConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ConsoleConfig {
            hidden_drain_limit: Some(0),
            ..ConsoleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let json = r#"{ "history_cap": 500, "capture_timestamps": true }"#;
        let config: ConsoleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.history_cap, 500);
        assert!(config.capture_timestamps);
        assert_eq!(config.queue_capacity, 1024);
        assert_eq!(config.hidden_drain_limit, Some(64));
        assert!(config.start_visible);
    }
}
