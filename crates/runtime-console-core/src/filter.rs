//! Display filter: severity mask, collapse mode and search query

use crate::entry::LogEntry;
use crate::error::ConsoleError;
use crate::severity::SeverityMask;
use regex::{Regex, RegexBuilder};

/// Search applied on top of the severity mask
#[derive(Debug, Clone, Default)]
pub enum SearchQuery {
    #[default]
    None,
    /// Case-insensitive substring; the needle is stored lowercased
    Substring(String),
    /// Case-insensitive regular expression
    Regex(Regex),
}

impl SearchQuery {
    /// Build a substring query; an empty term means no search
    pub fn substring(term: &str) -> Self {
        if term.is_empty() {
            Self::None
        } else {
            Self::Substring(term.to_lowercase())
        }
    }

    /// Build a regex query; an empty pattern means no search
    pub fn regex(pattern: &str) -> Result<Self, ConsoleError> {
        if pattern.is_empty() {
            return Ok(Self::None);
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ConsoleError::InvalidSearchPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self::Regex(regex))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Text of the active term, if any
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Substring(needle) => Some(needle.as_str()),
            Self::Regex(regex) => Some(regex.as_str()),
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            Self::None => true,
            Self::Substring(needle) => contains_ignore_case(haystack, needle),
            Self::Regex(regex) => regex.is_match(haystack),
        }
    }
}

impl PartialEq for SearchQuery {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Substring(a), Self::Substring(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// Case-insensitive containment of an already lowercased `needle`
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle.is_ascii() {
        let needle = needle.as_bytes();
        return haystack
            .as_bytes()
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle));
    }
    haystack.to_lowercase().contains(needle)
}

/// Predicate deciding which entries belong in the display view
#[derive(Debug, Clone, PartialEq)]
pub struct LogFilter {
    pub mask: SeverityMask,
    /// Show one row per unique entry instead of every arrival
    pub collapsed: bool,
    pub search: SearchQuery,
    /// Also search the context text, not only the message
    pub search_context: bool,
}

impl LogFilter {
    pub fn new(collapsed: bool, search_context: bool) -> Self {
        Self {
            mask: SeverityMask::all(),
            collapsed,
            search: SearchQuery::None,
            search_context,
        }
    }

    /// Everything passes, so the source can be copied wholesale
    pub fn is_match_all(&self) -> bool {
        self.mask.is_all() && self.search.is_none()
    }

    /// Nothing can pass
    pub fn is_match_nothing(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if !self.mask.accepts(entry.severity()) {
            return false;
        }
        if self.search.is_none() {
            return true;
        }
        self.search.is_match(entry.message())
            || (self.search_context && self.search.is_match(entry.context()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_is_case_insensitive() {
        let query = SearchQuery::substring("ErRoR");
        assert!(query.is_match("An error occurred"));
        assert!(query.is_match("ERROR"));
        assert!(!query.is_match("err"));
        assert_eq!(query.term(), Some("error"));
    }

    #[test]
    fn test_substring_non_ascii() {
        let query = SearchQuery::substring("ÜBER");
        assert!(query.is_match("Straße über alles"));
        assert!(!query.is_match("uber"));
    }

    #[test]
    fn test_empty_terms_disable_search() {
        assert!(SearchQuery::substring("").is_none());
        assert!(SearchQuery::regex("").unwrap().is_none());
        assert!(SearchQuery::None.is_match("anything"));
    }

    #[test]
    fn test_regex_query() {
        let query = SearchQuery::regex(r"^conn(ect)?ion \d+").unwrap();
        assert!(query.is_match("Connection 42 closed"));
        assert!(!query.is_match("lost connection 42"));
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let err = SearchQuery::regex("(unclosed").unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidSearchPattern { .. }));
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_query_equality() {
        assert_eq!(SearchQuery::substring("Ap"), SearchQuery::substring("ap"));
        assert_eq!(
            SearchQuery::regex("a+").unwrap(),
            SearchQuery::regex("a+").unwrap()
        );
        assert_ne!(SearchQuery::substring("a+"), SearchQuery::regex("a+").unwrap());
    }

    #[test]
    fn test_filter_shortcuts() {
        let mut filter = LogFilter::new(false, false);
        assert!(filter.is_match_all());

        filter.search = SearchQuery::substring("x");
        assert!(!filter.is_match_all());

        filter.mask = SeverityMask::empty();
        assert!(filter.is_match_nothing());
    }
}
