use regex::{NoExpand, Regex};

use super::CharFilter;
use crate::error::{OccucodeError, Result};

/// A char filter that replaces every match of a regex pattern with a fixed string.
///
/// The replacement is literal: `$1` in the replacement is not expanded.
#[derive(Debug, Clone)]
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| OccucodeError::analysis(format!("invalid pattern {pattern:?}: {e}")))?;
        Ok(Self::from_regex(pattern, replacement))
    }

    /// Create a filter that deletes every match of `pattern`.
    pub fn remove(pattern: &str) -> Result<Self> {
        Self::new(pattern, "")
    }

    /// Wrap an already-compiled regex.
    pub fn from_regex(pattern: Regex, replacement: &str) -> Self {
        Self {
            pattern,
            replacement: replacement.to_string(),
        }
    }

    /// The underlying pattern source.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, NoExpand(&self.replacement))
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}
