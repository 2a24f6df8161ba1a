//! Reference index: the alias table of a taxonomy version and its embeddings.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::analysis::normalizer::JobTitleNormalizer;
use crate::embedding::TextEmbedder;
use crate::error::{OccucodeError, Result};
use crate::taxonomy::{AliasEntry, ReferenceDataSource, Taxonomy, prepare_aliases};
use crate::vector::{EmbeddingMatrix, Vector};

/// Aliases of one taxonomy version with one unit-normalized embedding row per
/// alias, in the same order. Immutable once built.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    version: String,
    taxonomy: Taxonomy,
    aliases: Vec<AliasEntry>,
    embeddings: EmbeddingMatrix,
}

/// How alias text is prepared before embedding.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexOptions<'a> {
    /// Add taxonomy display names as aliases.
    pub complete_aliases: bool,
    /// Re-run the query normalizer on alias text.
    pub normalizer: Option<&'a JobTitleNormalizer>,
}

impl ReferenceIndex {
    /// Assemble an index from prepared aliases and their embeddings.
    pub fn new(
        version: impl Into<String>,
        taxonomy: Taxonomy,
        aliases: Vec<AliasEntry>,
        embeddings: Vec<Vector>,
    ) -> Result<Self> {
        let version = version.into();
        if aliases.is_empty() {
            return Err(OccucodeError::missing_reference_data(format!(
                "no aliases for taxonomy version {version}"
            )));
        }
        if embeddings.len() != aliases.len() {
            return Err(OccucodeError::embedding(format!(
                "expected {} alias embeddings, got {}",
                aliases.len(),
                embeddings.len()
            )));
        }
        let embeddings = EmbeddingMatrix::from_vectors(embeddings)?;
        Ok(Self {
            version,
            taxonomy,
            aliases,
            embeddings,
        })
    }

    /// Load the reference data of `version` and embed every alias in one
    /// provider call.
    pub async fn build(
        version: &str,
        source: &dyn ReferenceDataSource,
        embedder: &dyn TextEmbedder,
        options: IndexOptions<'_>,
    ) -> Result<Self> {
        let start = Instant::now();
        let taxonomy = source.load_taxonomy(version)?;
        let raw_aliases = source.load_aliases(version)?;

        let mut aliases = prepare_aliases(&taxonomy, raw_aliases, options.complete_aliases);
        if let Some(normalizer) = options.normalizer {
            for entry in &mut aliases {
                let normalized = normalizer.normalize(&entry.alias);
                if !normalized.is_empty() {
                    entry.alias = normalized;
                }
            }
            // Cleaning can make distinct aliases collide.
            aliases = prepare_aliases(&taxonomy, aliases, false);
        }
        let texts: Vec<&str> = aliases.iter().map(|a| a.alias.as_str()).collect();
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&texts).await?
        };

        let index = Self::new(version, taxonomy, aliases, embeddings)?;
        info!(
            "built reference index {}: {} aliases, {} codes, dimension {}, embedder {}, took {:?}",
            index.version,
            index.len(),
            index.taxonomy.len(),
            index.dimension(),
            embedder.name(),
            start.elapsed()
        );
        Ok(index)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn aliases(&self) -> &[AliasEntry] {
        &self.aliases
    }

    pub fn alias(&self, i: usize) -> Option<&AliasEntry> {
        self.aliases.get(i)
    }

    pub fn embeddings(&self) -> &EmbeddingMatrix {
        &self.embeddings
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.embeddings.dimension()
    }
}

/// Per-version, build-once cache of reference indexes.
///
/// Concurrent requests for the same version wait for a single build. A failed
/// build leaves nothing behind, so the next request starts over.
#[derive(Debug, Default)]
pub struct ReferenceIndexCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Arc<ReferenceIndex>>>>>,
}

impl ReferenceIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached index of `version`, running `build` if there is none.
    pub async fn get_or_try_build<F, Fut>(&self, version: &str, build: F) -> Result<Arc<ReferenceIndex>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ReferenceIndex>>,
    {
        let cell = self.entries.lock().entry(version.to_string()).or_default().clone();
        let index = cell
            .get_or_try_init(|| async { build().await.map(Arc::new) })
            .await?;
        Ok(index.clone())
    }

    /// The cached index of `version`, if built.
    pub fn get(&self, version: &str) -> Option<Arc<ReferenceIndex>> {
        self.entries
            .lock()
            .get(version)
            .and_then(|cell| cell.get().cloned())
    }

    /// Versions with a built index.
    pub fn versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self
            .entries
            .lock()
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(version, _)| version.clone())
            .collect();
        versions.sort();
        versions
    }

    /// Drop the index of `version`; the next request rebuilds it.
    pub fn invalidate(&self, version: &str) -> bool {
        self.entries
            .lock()
            .remove(version)
            .is_some_and(|cell| cell.initialized())
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
