//! Line filtering with regex patterns.
//!
//! Drops relayed lines whose plain text matches any configured pattern.

use fancy_regex::Regex;
use tracing::warn;

/// Filter that checks lines against regex patterns.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    patterns: Vec<CompiledPattern>,
}

/// A compiled regex pattern with its original string for debugging.
#[derive(Debug, Clone)]
struct CompiledPattern {
    original: String,
    regex: Regex,
}

impl MessageFilter {
    /// Create a filter from pattern strings.
    ///
    /// Invalid regex patterns are logged and skipped.
    pub fn new(patterns: Option<Vec<String>>) -> Self {
        Self {
            patterns: compile_patterns(patterns.unwrap_or_default()),
        }
    }

    /// A filter that lets everything through.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `text` matches a pattern and should be dropped.
    pub fn should_filter(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| {
            p.regex.is_match(text).unwrap_or_else(|e| {
                warn!(pattern = %p.original, error = %e, "Regex match error");
                false
            })
        })
    }

    pub fn has_patterns(&self) -> bool {
        !self.patterns.is_empty()
    }
}

fn compile_patterns(patterns: Vec<String>) -> Vec<CompiledPattern> {
    patterns
        .into_iter()
        .filter_map(|pattern| match Regex::new(&pattern) {
            Ok(regex) => Some(CompiledPattern {
                original: pattern,
                regex,
            }),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Invalid filter regex pattern");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> MessageFilter {
        MessageFilter::new(Some(patterns.iter().map(|p| p.to_string()).collect()))
    }

    #[test]
    fn test_empty_filter_allows_all() {
        let filter = MessageFilter::empty();
        assert!(!filter.has_patterns());
        assert!(!filter.should_filter("any line"));
        assert!(!MessageFilter::new(None).should_filter("any line"));
    }

    #[test]
    fn test_anchored_pattern() {
        let filter = filter(&["^!cmd"]);
        assert!(filter.should_filter("!cmd reload"));
        assert!(!filter.should_filter("say !cmd"));
    }

    #[test]
    fn test_any_pattern_matches() {
        let filter = filter(&["spam", "https?://\\S+"]);
        assert!(filter.should_filter("more spam"));
        assert!(filter.should_filter("see http://example.org"));
        assert!(!filter.should_filter("hello there"));
    }

    #[test]
    fn test_invalid_regex_skipped() {
        let filter = filter(&["[invalid", "valid"]);
        assert!(filter.has_patterns());
        assert!(filter.should_filter("a valid line"));
        assert!(!filter.should_filter("[bogus"));
    }

    #[test]
    fn test_lookaround() {
        let filter = filter(&["(?i)^(?!admin:).*password"]);
        assert!(filter.should_filter("my PASSWORD is hunter2"));
        assert!(!filter.should_filter("admin: password rotated"));
    }
}
