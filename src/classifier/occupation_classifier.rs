//! Classifier facade.

use std::sync::Arc;

use log::debug;

use crate::analysis::normalizer::JobTitleNormalizer;
use crate::classifier::config::{ClassifierConfig, ClassifyOptions};
use crate::classifier::index::{IndexOptions, ReferenceIndex, ReferenceIndexCache};
use crate::classifier::input::ClassifyInput;
use crate::classifier::matcher::SimilarityMatcher;
use crate::classifier::result::{ClassifiedTitle, MatchResult};
use crate::embedding::TextEmbedder;
use crate::error::{OccucodeError, Result};
use crate::taxonomy::{CsvReferenceData, ReferenceDataSource};
use crate::vector::EmbeddingMatrix;

/// Classifies job titles into taxonomy codes.
///
/// Owns the per-version reference index cache, so one instance should be
/// shared (it is `Send + Sync`) rather than rebuilt per request.
pub struct OccupationClassifier {
    config: ClassifierConfig,
    normalizer: JobTitleNormalizer,
    embedder: Arc<dyn TextEmbedder>,
    source: Arc<dyn ReferenceDataSource>,
    matcher: SimilarityMatcher,
    cache: ReferenceIndexCache,
}

impl std::fmt::Debug for OccupationClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupationClassifier")
            .field("config", &self.config)
            .field("normalizer", &self.normalizer)
            .field("embedder", &self.embedder.name())
            .field("cache", &self.cache)
            .finish()
    }
}

impl OccupationClassifier {
    pub fn new(
        config: ClassifierConfig,
        embedder: Arc<dyn TextEmbedder>,
        source: Arc<dyn ReferenceDataSource>,
    ) -> Result<Self> {
        config.validate()?;
        let normalizer = JobTitleNormalizer::from_config(&config.normalizer)?;
        let matcher = SimilarityMatcher::new(config.tiers.clone());
        Ok(Self {
            config,
            normalizer,
            embedder,
            source,
            matcher,
            cache: ReferenceIndexCache::new(),
        })
    }

    /// Build from configuration alone: CSV reference data from `data_dir`
    /// and the configured embedder, constructed on first use.
    pub fn from_config(config: ClassifierConfig) -> Result<Self> {
        let source = Arc::new(CsvReferenceData::new(config.data_dir.clone()));
        let embedder = Arc::new(config.embedder.build_lazy());
        Self::new(config, embedder, source)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &JobTitleNormalizer {
        &self.normalizer
    }

    pub fn default_options(&self) -> ClassifyOptions {
        self.config.options()
    }

    /// Clean a raw title the same way classification does.
    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    fn version<'a>(&'a self, options: &'a ClassifyOptions) -> &'a str {
        options.version.as_deref().unwrap_or(&self.config.version)
    }

    /// The reference index of `version`, built on first request.
    pub async fn reference_index(&self, version: &str) -> Result<Arc<ReferenceIndex>> {
        let source = self.source.as_ref();
        let embedder = self.embedder.as_ref();
        let options = IndexOptions {
            complete_aliases: self.config.complete_aliases,
            normalizer: self
                .config
                .normalize_aliases
                .then_some(&self.normalizer),
        };
        self.cache
            .get_or_try_build(version, move || async move {
                ReferenceIndex::build(version, source, embedder, options).await
            })
            .await
    }

    /// Classify one title. An input that normalizes to nothing yields no
    /// matches without calling the embedder.
    pub async fn classify_one(&self, title: &str, options: &ClassifyOptions) -> Result<Vec<MatchResult>> {
        let normalized = self.normalize(title);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }
        let index = self.reference_index(self.version(options)).await?;
        let mut groups = self.match_texts(&[normalized.as_str()], &index, options).await?;
        Ok(groups.pop().unwrap_or_default())
    }

    /// Classify many titles. Result `i` belongs to input `i`.
    ///
    /// Non-empty normalized titles are embedded `batch_size` inputs at a time,
    /// one provider call per batch.
    pub async fn classify_many(
        &self,
        input: impl Into<ClassifyInput>,
        options: &ClassifyOptions,
    ) -> Result<Vec<ClassifiedTitle>> {
        if options.batch_size == 0 {
            return Err(OccucodeError::invalid_input("batch_size must be positive"));
        }

        let input = input.into();
        if let ClassifyInput::Single(title) = &input {
            let matches = self.classify_one(title, options).await?;
            return Ok(vec![ClassifiedTitle {
                input: Some(title.clone()),
                normalized: self.normalize(title),
                matches,
            }]);
        }

        let mut results: Vec<ClassifiedTitle> = input
            .into_titles()
            .into_iter()
            .map(|title| {
                let normalized = self.normalizer.normalize_opt(title.as_deref());
                ClassifiedTitle {
                    input: title,
                    normalized,
                    matches: Vec::new(),
                }
            })
            .collect();

        if results.iter().all(|r| r.normalized.is_empty()) {
            return Ok(results);
        }
        let index = self.reference_index(self.version(options)).await?;

        let total = results.len().div_ceil(options.batch_size);
        for (batch_no, batch) in results.chunks_mut(options.batch_size).enumerate() {
            let mut pending: Vec<&mut ClassifiedTitle> =
                batch.iter_mut().filter(|r| !r.normalized.is_empty()).collect();
            debug!(
                "classifying batch {}/{}: {} titles to embed",
                batch_no + 1,
                total,
                pending.len()
            );
            if pending.is_empty() {
                continue;
            }

            let texts: Vec<&str> = pending.iter().map(|r| r.normalized.as_str()).collect();
            let groups = self.match_texts(&texts, &index, options).await?;
            for (result, matches) in pending.iter_mut().zip(groups) {
                result.matches = matches;
            }
        }

        Ok(results)
    }

    async fn match_texts(
        &self,
        texts: &[&str],
        index: &ReferenceIndex,
        options: &ClassifyOptions,
    ) -> Result<Vec<Vec<MatchResult>>> {
        let vectors = self.embedder.embed_batch(texts).await?;
        if vectors.len() != texts.len() {
            return Err(OccucodeError::embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        let queries = EmbeddingMatrix::from_vectors(vectors)?;
        self.matcher.match_queries(&queries, index, options)
    }
}
