//! Text embedding trait used by the reference index and the classifier.

use async_trait::async_trait;

use crate::error::Result;
use crate::vector::Vector;

/// Trait for converting text to vector embeddings.
///
/// Implementations must return vectors of [`dimension`](Self::dimension)
/// length. They need not be unit-normalized; the index normalizes every row.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use occucode::embedding::text_embedder::TextEmbedder;
/// use occucode::error::Result;
/// use occucode::vector::Vector;
///
/// struct ConstantEmbedder;
///
/// #[async_trait]
/// impl TextEmbedder for ConstantEmbedder {
///     async fn embed(&self, _text: &str) -> Result<Vector> {
///         Ok(Vector::new(vec![1.0, 0.0]))
///     }
///
///     fn dimension(&self) -> usize {
///         2
///     }
/// }
/// ```
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Generate embeddings for multiple texts, one per input in order.
    ///
    /// The default implementation calls `embed` sequentially.
    /// Override this method for providers with native batching.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Get the dimension of generated embeddings.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this embedder, used in log messages.
    fn name(&self) -> &str {
        "unknown"
    }
}
