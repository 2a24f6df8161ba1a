//! Confidence-tiered code resolution.
//!
//! A weak match should not claim the most specific level of the taxonomy. The
//! tier policy maps a similarity score to the number of leading code
//! characters that are kept; the rest is filled with a padding character, so
//! the code of an ancestor node is returned instead.

use serde::{Deserialize, Serialize};

use crate::error::{OccucodeError, Result};

/// A similarity band: scores of at least `min_similarity` keep `keep` leading
/// characters of the code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub min_similarity: f32,
    pub keep: usize,
}

impl Tier {
    pub const fn new(min_similarity: f32, keep: usize) -> Self {
        Self {
            min_similarity,
            keep,
        }
    }
}

/// Tier table plus the code layout it operates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPolicy {
    /// Width of a full code.
    pub code_width: usize,
    /// Character used for the truncated positions.
    pub fill: char,
    pub tiers: Vec<Tier>,
    /// Code returned below the lowest tier. `None` drops the candidate.
    pub sentinel_code: Option<String>,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            code_width: 7,
            fill: '0',
            tiers: vec![
                Tier::new(0.8, 7),
                Tier::new(0.6, 5),
                Tier::new(0.4, 3),
                Tier::new(0.2, 1),
            ],
            sentinel_code: Some("8000000".to_string()),
        }
    }
}

impl TierPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.code_width == 0 {
            return Err(OccucodeError::invalid_config("tier code_width must be positive"));
        }
        for tier in &self.tiers {
            if !tier.min_similarity.is_finite() {
                return Err(OccucodeError::invalid_config(format!(
                    "tier threshold {} is not a finite number",
                    tier.min_similarity
                )));
            }
            if tier.keep == 0 || tier.keep > self.code_width {
                return Err(OccucodeError::invalid_config(format!(
                    "tier keep {} must be between 1 and {}",
                    tier.keep, self.code_width
                )));
            }
        }
        Ok(())
    }

    /// The highest tier `similarity` reaches.
    pub fn tier_for(&self, similarity: f32) -> Option<&Tier> {
        self.tiers
            .iter()
            .filter(|t| similarity >= t.min_similarity)
            .max_by(|a, b| a.min_similarity.total_cmp(&b.min_similarity))
    }

    /// Resolve the code reported for a match on `code` with `similarity`.
    ///
    /// Returns `None` when the score is below every tier and no sentinel is
    /// configured.
    pub fn resolve(&self, code: &str, similarity: f32) -> Option<String> {
        match self.tier_for(similarity) {
            Some(tier) => Some(self.truncate(code, tier.keep)),
            None => self.sentinel_code.clone(),
        }
    }

    /// Keep the first `keep` characters and pad to the code width.
    pub fn truncate(&self, code: &str, keep: usize) -> String {
        let len = code.chars().count();
        if keep >= len {
            return code.to_string();
        }
        let width = self.code_width.max(len);
        code.chars()
            .take(keep)
            .chain(std::iter::repeat_n(self.fill, width - keep))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let policy = TierPolicy::default();
        assert_eq!(policy.resolve("2060702", 0.95).as_deref(), Some("2060702"));
        assert_eq!(policy.resolve("2060702", 0.8).as_deref(), Some("2060702"));
        assert_eq!(policy.resolve("2060702", 0.79).as_deref(), Some("2060700"));
        assert_eq!(policy.resolve("2060702", 0.6).as_deref(), Some("2060700"));
        assert_eq!(policy.resolve("2060702", 0.5).as_deref(), Some("2060000"));
        assert_eq!(policy.resolve("2060702", 0.2).as_deref(), Some("2000000"));
        assert_eq!(policy.resolve("2060702", 0.19).as_deref(), Some("8000000"));
        assert_eq!(policy.resolve("2060702", -0.5).as_deref(), Some("8000000"));
    }

    #[test]
    fn test_no_sentinel_drops() {
        let policy = TierPolicy {
            sentinel_code: None,
            ..TierPolicy::default()
        };
        assert_eq!(policy.resolve("2060702", 0.1), None);
        assert_eq!(policy.resolve("2060702", f32::NAN), None);
    }

    #[test]
    fn test_unordered_tiers() {
        let policy = TierPolicy {
            tiers: vec![Tier::new(0.3, 3), Tier::new(0.9, 7), Tier::new(0.5, 5)],
            ..TierPolicy::default()
        };
        assert_eq!(policy.resolve("4030205", 0.95).as_deref(), Some("4030205"));
        assert_eq!(policy.resolve("4030205", 0.7).as_deref(), Some("4030200"));
        assert_eq!(policy.resolve("4030205", 0.4).as_deref(), Some("4030000"));
    }

    #[test]
    fn test_truncate_short_and_long_codes() {
        let policy = TierPolicy::default();
        assert_eq!(policy.truncate("206", 5), "206");
        assert_eq!(policy.truncate("20607021", 3), "20600000");
    }

    #[test]
    fn test_validate() {
        assert!(TierPolicy::default().validate().is_ok());
        let bad = TierPolicy {
            tiers: vec![Tier::new(0.5, 9)],
            ..TierPolicy::default()
        };
        assert!(bad.validate().is_err());
        let bad = TierPolicy {
            tiers: vec![Tier::new(f32::NAN, 3)],
            ..TierPolicy::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_policy_from_json() {
        let policy: TierPolicy = serde_json::from_str(
            r#"{"tiers": [{"min_similarity": 0.9, "keep": 7}], "sentinel_code": null}"#,
        )
        .unwrap();
        assert_eq!(policy.code_width, 7);
        assert_eq!(policy.tiers.len(), 1);
        assert_eq!(policy.sentinel_code, None);
    }
}
