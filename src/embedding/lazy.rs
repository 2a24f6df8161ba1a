//! Deferred construction of an embedding provider.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::Result;
use crate::vector::Vector;

type EmbedderFactory = Box<dyn Fn() -> Result<Arc<dyn TextEmbedder>> + Send + Sync>;

/// Builds the wrapped provider the first time it is needed and reuses it.
///
/// Model loading is often slow; wrapping the provider means a classifier can
/// be constructed (and empty inputs classified) without paying for it. If the
/// factory fails the error is returned and the next call tries again.
pub struct LazyTextEmbedder {
    name: String,
    factory: EmbedderFactory,
    inner: OnceCell<Arc<dyn TextEmbedder>>,
}

impl std::fmt::Debug for LazyTextEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyTextEmbedder")
            .field("name", &self.name)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl LazyTextEmbedder {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TextEmbedder>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Box::new(factory),
            inner: OnceCell::new(),
        }
    }

    /// Whether the wrapped provider has been built.
    pub fn is_initialized(&self) -> bool {
        self.inner.initialized()
    }

    /// Get the wrapped provider, building it on first use.
    pub async fn get(&self) -> Result<&Arc<dyn TextEmbedder>> {
        self.inner
            .get_or_try_init(|| async { (self.factory)() })
            .await
    }
}

#[async_trait]
impl TextEmbedder for LazyTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.get().await?.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        self.get().await?.embed_batch(texts).await
    }

    /// Returns 0 until the provider has been built.
    fn dimension(&self) -> usize {
        self.inner.get().map_or(0, |e| e.dimension())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::embedding::hashing::HashingTextEmbedder;
    use crate::error::OccucodeError;

    #[tokio::test]
    async fn test_factory_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let lazy = LazyTextEmbedder::new("hashing", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(HashingTextEmbedder::with_dimension(16)?) as Arc<dyn TextEmbedder>)
        });

        assert!(!lazy.is_initialized());
        assert_eq!(lazy.dimension(), 0);
        lazy.embed("厨师").await.unwrap();
        lazy.embed_batch(&["厨师", "面点师"]).await.unwrap();
        assert!(lazy.is_initialized());
        assert_eq!(lazy.dimension(), 16);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_factory_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let lazy = LazyTextEmbedder::new("flaky", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(OccucodeError::embedding("model unavailable"))
            } else {
                Ok(Arc::new(HashingTextEmbedder::new()) as Arc<dyn TextEmbedder>)
            }
        });

        assert!(lazy.embed("厨师").await.is_err());
        assert!(!lazy.is_initialized());
        assert!(lazy.embed("厨师").await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
