//! Severity levels, filter masks and per-category counters

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Severity of a captured log event
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Exception,
    Assert,
}

impl Severity {
    /// The filter category this severity is counted and filtered under
    ///
    /// Exceptions and assertions share the error category.
    pub fn category(self) -> SeverityMask {
        match self {
            Self::Info => SeverityMask::INFO,
            Self::Warning => SeverityMask::WARNING,
            Self::Error | Self::Exception | Self::Assert => SeverityMask::ERROR,
        }
    }
}

bitflags! {
    /// Set of severity categories accepted by a filter
    ///
    /// `SeverityMask::all()` matches everything, `SeverityMask::empty()` matches nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SeverityMask: u8 {
        const INFO = 1 << 0;
        const WARNING = 1 << 1;
        const ERROR = 1 << 2;
    }
}

impl SeverityMask {
    /// Check whether a severity falls into one of the accepted categories
    pub fn accepts(self, severity: Severity) -> bool {
        self.intersects(severity.category())
    }
}

impl Default for SeverityMask {
    fn default() -> Self {
        Self::all()
    }
}

/// Running per-category counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

impl SeverityCounts {
    pub fn increment(&mut self, severity: Severity) {
        *self.slot_mut(severity) += 1;
    }

    /// Decrement the counter for `severity`, saturating at zero
    pub fn decrement(&mut self, severity: Severity) {
        let slot = self.slot_mut(severity);
        *slot = slot.saturating_sub(1);
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity.category() {
            SeverityMask::INFO => self.info,
            SeverityMask::WARNING => self.warning,
            _ => self.error,
        }
    }

    pub fn total(&self) -> usize {
        self.info + self.warning + self.error
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Add another set of counters to this one
    pub fn merge(&mut self, other: SeverityCounts) {
        self.info += other.info;
        self.warning += other.warning;
        self.error += other.error;
    }

    /// Subtract another set of counters, saturating at zero
    pub fn subtract(&mut self, other: SeverityCounts) {
        self.info = self.info.saturating_sub(other.info);
        self.warning = self.warning.saturating_sub(other.warning);
        self.error = self.error.saturating_sub(other.error);
    }

    fn slot_mut(&mut self, severity: Severity) -> &mut usize {
        match severity.category() {
            SeverityMask::INFO => &mut self.info,
            SeverityMask::WARNING => &mut self.warning,
            _ => &mut self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_like_severities_share_category() {
        assert_eq!(Severity::Error.category(), SeverityMask::ERROR);
        assert_eq!(Severity::Exception.category(), SeverityMask::ERROR);
        assert_eq!(Severity::Assert.category(), SeverityMask::ERROR);
        assert_eq!(Severity::Warning.category(), SeverityMask::WARNING);
    }

    #[test]
    fn test_mask_accepts() {
        let mask = SeverityMask::INFO | SeverityMask::ERROR;
        assert!(mask.accepts(Severity::Info));
        assert!(mask.accepts(Severity::Exception));
        assert!(!mask.accepts(Severity::Warning));

        for severity in Severity::iter() {
            assert!(!SeverityMask::empty().accepts(severity));
            assert!(SeverityMask::all().accepts(severity));
        }
    }

    #[test]
    fn test_severity_string_round_trip() {
        for severity in Severity::iter() {
            let name = severity.to_string();
            assert_eq!(Severity::from_str(&name).unwrap(), severity);
        }
        assert!(Severity::from_str("Verbose").is_err());
    }

    #[test]
    fn test_counts() {
        let mut counts = SeverityCounts::default();
        counts.increment(Severity::Info);
        counts.increment(Severity::Assert);
        counts.increment(Severity::Error);
        assert_eq!(counts.get(Severity::Exception), 2);
        assert_eq!(counts.total(), 3);

        counts.decrement(Severity::Warning); // Saturates
        assert_eq!(counts.warning, 0);

        let mut other = SeverityCounts::default();
        other.merge(counts);
        other.subtract(SeverityCounts {
            info: 5,
            warning: 0,
            error: 1,
        });
        assert_eq!(other.info, 0);
        assert_eq!(other.error, 1);
    }
}
