use std::collections::HashSet;

use regex::{Captures, Regex};

use super::CharFilter;
use crate::error::Result;

/// Alphanumeric terms that look like posting codes but carry meaning
/// (licence classes, engine and protocol names).
pub const DEFAULT_CODE_WHITELIST: &[&str] = &[
    "3d", "a1", "a2", "b1", "b2", "b2b", "b2c", "c1", "c2", "h5", "o2o", "p2p", "ue4", "ue5",
];

// ASCII boundaries: a code glued to CJK text ("专员J10050") still counts as a
// separate token, while "abc123" inside "xabc123y" does not.
const CODE_TOKEN_PATTERN: &str = r"(?-u:\b)[A-Za-z]+[0-9]+[A-Za-z0-9]*(?-u:\b)";

/// Removes internal job-posting reference codes such as `J10050`, `KG0050`
/// or `m601x`: one or more letters immediately followed by digits.
///
/// Tokens whose lower-cased form is whitelisted are kept with their original
/// casing.
#[derive(Debug, Clone)]
pub struct CodeTokenCharFilter {
    pattern: Regex,
    whitelist: HashSet<String>,
}

impl CodeTokenCharFilter {
    pub fn new() -> Result<Self> {
        Self::with_whitelist(DEFAULT_CODE_WHITELIST)
    }

    pub fn with_whitelist<S: AsRef<str>>(whitelist: &[S]) -> Result<Self> {
        let pattern = Regex::new(CODE_TOKEN_PATTERN).map_err(|e| {
            crate::error::OccucodeError::analysis(format!("invalid code token pattern: {e}"))
        })?;
        Ok(Self {
            pattern,
            whitelist: whitelist
                .iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        })
    }

    /// Whether a token would be preserved.
    pub fn is_whitelisted(&self, token: &str) -> bool {
        self.whitelist.contains(&token.to_lowercase())
    }
}

impl CharFilter for CodeTokenCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, |caps: &Captures<'_>| {
                let token = &caps[0];
                if self.is_whitelisted(token) {
                    token.to_string()
                } else {
                    String::new()
                }
            })
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "code_token"
    }
}
