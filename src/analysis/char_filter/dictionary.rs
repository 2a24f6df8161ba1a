//! Whole-word removal of a fixed term list.
//!
//! Used twice by the normalizer: once for the stop-word list and once for the
//! geographic entity table. All terms are compiled into a single alternation,
//! longest term first, so "北京市" wins over its short form "北京".

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::CharFilter;
use crate::error::{OccucodeError, Result};

/// How a dictionary term must be delimited to count as a whole word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Unicode word boundaries on both sides. CJK characters are word
    /// characters, so a CJK term only matches next to punctuation, whitespace,
    /// ASCII symbols or the ends of the string.
    #[default]
    Unicode,
    /// Boundaries are only enforced where a term edge is an ASCII word
    /// character. CJK edges match anywhere, ASCII terms still cannot cut into a
    /// longer ASCII word.
    AsciiAware,
}

/// Removes every whole-word occurrence of any term in a dictionary.
#[derive(Debug, Clone)]
pub struct DictionaryCharFilter {
    pattern: Option<Regex>,
    term_count: usize,
    name: &'static str,
}

impl DictionaryCharFilter {
    /// Build a filter from a term list. Empty and duplicate terms are ignored.
    pub fn new<I, S>(name: &'static str, terms: I, mode: BoundaryMode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        // Longest first so the leftmost-first alternation prefers full names.
        terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        terms.dedup();

        let term_count = terms.len();
        if terms.is_empty() {
            return Ok(Self {
                pattern: None,
                term_count,
                name,
            });
        }

        let source = match mode {
            BoundaryMode::Unicode => {
                let alternation = terms
                    .iter()
                    .map(|t| regex::escape(t))
                    .collect::<Vec<_>>()
                    .join("|");
                format!(r"\b(?:{alternation})\b")
            }
            BoundaryMode::AsciiAware => terms
                .iter()
                .map(|t| ascii_aware_term(t))
                .collect::<Vec<_>>()
                .join("|"),
        };

        let pattern = Regex::new(&source).map_err(|e| {
            OccucodeError::analysis(format!("failed to compile {name} dictionary: {e}"))
        })?;

        Ok(Self {
            pattern: Some(pattern),
            term_count,
            name,
        })
    }

    /// Number of distinct terms in the dictionary.
    pub fn len(&self) -> usize {
        self.term_count
    }

    pub fn is_empty(&self) -> bool {
        self.term_count == 0
    }
}

fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn ascii_aware_term(term: &str) -> String {
    let escaped = regex::escape(term);
    let lead = match term.chars().next() {
        Some(c) if is_ascii_word(c) => r"(?-u:\b)",
        _ => "",
    };
    let tail = match term.chars().last() {
        Some(c) if is_ascii_word(c) => r"(?-u:\b)",
        _ => "",
    };
    format!("{lead}{escaped}{tail}")
}

impl CharFilter for DictionaryCharFilter {
    fn filter(&self, input: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern.replace_all(input, "").into_owned(),
            None => input.to_string(),
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
