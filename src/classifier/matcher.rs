//! Nearest-alias search with optional tiered code resolution.

use rayon::prelude::*;

use crate::classifier::config::ClassifyOptions;
use crate::classifier::index::ReferenceIndex;
use crate::classifier::resolution::TierPolicy;
use crate::classifier::result::MatchResult;
use crate::error::Result;
use crate::vector::EmbeddingMatrix;
use crate::vector::similarity::PARALLEL_THRESHOLD;

/// Ranks reference aliases against query embeddings.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatcher {
    policy: TierPolicy,
}

impl SimilarityMatcher {
    pub fn new(policy: TierPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// Match every query row against the index.
    ///
    /// Returns one list per query row, in row order. Candidates below
    /// `threshold` are discarded before the `top_n` cut. Equal scores keep
    /// alias order. Fails when the query dimension differs from the index.
    pub fn match_queries(
        &self,
        queries: &EmbeddingMatrix,
        index: &ReferenceIndex,
        options: &ClassifyOptions,
    ) -> Result<Vec<Vec<MatchResult>>> {
        let scores = index.embeddings().similarity_matrix(queries)?;

        if scores.len() * index.len() < PARALLEL_THRESHOLD {
            Ok(scores
                .iter()
                .map(|row| self.rank(row, index, options))
                .collect())
        } else {
            Ok(scores
                .par_iter()
                .map(|row| self.rank(row, index, options))
                .collect())
        }
    }

    fn rank(&self, scores: &[f32], index: &ReferenceIndex, options: &ClassifyOptions) -> Vec<MatchResult> {
        let mut candidates: Vec<usize> = match options.threshold {
            Some(threshold) => (0..scores.len()).filter(|&i| scores[i] >= threshold).collect(),
            None => (0..scores.len()).collect(),
        };
        // Stable: ties stay in alias order.
        candidates.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        if let Some(limit) = options.limit() {
            candidates.truncate(limit);
        }

        candidates
            .into_iter()
            .filter_map(|i| self.resolve(index, i, scores[i], options.hierarchical))
            .collect()
    }

    fn resolve(
        &self,
        index: &ReferenceIndex,
        alias_index: usize,
        similarity: f32,
        hierarchical: bool,
    ) -> Option<MatchResult> {
        let alias = index.alias(alias_index)?;
        let alias_name = Some(alias.name.clone()).filter(|n| !n.trim().is_empty());

        let (code, name) = if hierarchical {
            let code = self.policy.resolve(&alias.code, similarity)?;
            let name = match index.taxonomy().name(&code) {
                Some(name) => Some(name.to_string()),
                None if code == alias.code => alias_name,
                None => None,
            };
            (code, name)
        } else {
            (alias.code.clone(), alias_name)
        };

        Some(MatchResult {
            code,
            name,
            similarity,
            alias: alias.alias.clone(),
            alias_code: alias.code.clone(),
        })
    }
}
