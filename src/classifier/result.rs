//! Classification results, nested and flat.

use serde::{Deserialize, Serialize};

/// One resolved candidate for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Reported code, possibly truncated by the tier policy.
    pub code: String,
    /// Display name of `code`; `None` when the taxonomy has no such node.
    pub name: Option<String>,
    /// Cosine similarity between the query and the alias.
    pub similarity: f32,
    /// The alias that matched.
    pub alias: String,
    /// The alias's own, untruncated code.
    pub alias_code: String,
}

/// All matches for one input, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTitle {
    /// The raw input; `None` for a missing value in a series.
    pub input: Option<String>,
    /// The text that was embedded.
    pub normalized: String,
    pub matches: Vec<MatchResult>,
}

impl ClassifiedTitle {
    pub fn top(&self) -> Option<&MatchResult> {
        self.matches.first()
    }

    /// One record per match, or a single empty record when nothing matched.
    pub fn records(&self) -> Vec<ClassificationRecord> {
        if self.matches.is_empty() {
            return vec![ClassificationRecord {
                input: self.input.clone(),
                code: None,
                name: None,
                similarity: None,
            }];
        }
        self.matches
            .iter()
            .map(|m| ClassificationRecord {
                input: self.input.clone(),
                code: Some(m.code.clone()),
                name: m.name.clone(),
                similarity: Some(m.similarity),
            })
            .collect()
    }
}

/// Flat, table-shaped view of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub input: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub similarity: Option<f32>,
}

/// Flatten nested results into records, keeping input order.
pub fn flatten(results: &[ClassifiedTitle]) -> Vec<ClassificationRecord> {
    results.iter().flat_map(ClassifiedTitle::records).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(code: &str, similarity: f32) -> MatchResult {
        MatchResult {
            code: code.to_string(),
            name: None,
            similarity,
            alias: "alias".to_string(),
            alias_code: code.to_string(),
        }
    }

    #[test]
    fn test_flatten_keeps_alignment() {
        let results = vec![
            ClassifiedTitle {
                input: Some("a".into()),
                normalized: "a".into(),
                matches: vec![matched("1", 0.9), matched("2", 0.8)],
            },
            ClassifiedTitle {
                input: None,
                normalized: String::new(),
                matches: vec![],
            },
            ClassifiedTitle {
                input: Some("c".into()),
                normalized: "c".into(),
                matches: vec![matched("3", 0.7)],
            },
        ];

        let records = flatten(&results);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].input.as_deref(), Some("a"));
        assert_eq!(records[1].code.as_deref(), Some("2"));
        assert_eq!(records[2].input, None);
        assert_eq!(records[2].code, None);
        assert_eq!(records[3].similarity, Some(0.7));
        assert_eq!(results[0].top().map(|m| m.code.as_str()), Some("1"));
    }
}
