//! Deterministic feature-hashing embedder.

use async_trait::async_trait;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{OccucodeError, Result};
use crate::vector::Vector;

pub const DEFAULT_HASHING_DIMENSION: usize = 256;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Character n-gram lengths hashed into the vector.
const NGRAM_RANGE: std::ops::RangeInclusive<usize> = 1..=3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Embeds text by hashing its character 1- to 3-grams into a fixed number of
/// buckets.
///
/// Chinese titles carry most of their meaning in short character sequences,
/// so titles that share characters and bigrams land close together. The
/// output is case-folded and L2-normalized; the empty string maps to the zero
/// vector. Identical text always yields an identical vector.
#[derive(Debug, Clone)]
pub struct HashingTextEmbedder {
    dimension: usize,
}

impl HashingTextEmbedder {
    pub fn new() -> Self {
        Self {
            dimension: DEFAULT_HASHING_DIMENSION,
        }
    }

    pub fn with_dimension(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(OccucodeError::invalid_config(
                "hashing embedder dimension must be positive",
            ));
        }
        Ok(Self { dimension })
    }

    /// Embed synchronously; the async trait methods delegate here.
    pub fn embed_text(&self, text: &str) -> Vector {
        let chars: Vec<char> = text
            .trim()
            .chars()
            .flat_map(char::to_lowercase)
            .collect();
        let mut data = vec![0.0f32; self.dimension];
        let mut buf = String::new();

        for n in NGRAM_RANGE {
            if chars.len() < n {
                break;
            }
            // Longer n-grams are rarer and more specific.
            let weight = n as f32;
            for window in chars.windows(n) {
                buf.clear();
                buf.extend(window);
                let hash = fnv1a(buf.as_bytes());
                let bucket = (hash % self.dimension as u64) as usize;
                let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
                data[bucket] += sign * weight;
            }
        }

        Vector::new(data).normalized()
    }
}

impl Default for HashingTextEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextEmbedder for HashingTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::similarity::unit_cosine;

    #[test]
    fn test_deterministic_and_normalized() {
        let embedder = HashingTextEmbedder::new();
        let a = embedder.embed_text("软件工程师");
        let b = embedder.embed_text("软件工程师");
        assert_eq!(a, b);
        assert_eq!(a.dimension(), DEFAULT_HASHING_DIMENSION);
        assert!((a.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_folded() {
        let embedder = HashingTextEmbedder::new();
        assert_eq!(embedder.embed_text("Java工程师"), embedder.embed_text("java工程师"));
    }

    #[test]
    fn test_empty_is_zero() {
        let embedder = HashingTextEmbedder::new();
        assert_eq!(embedder.embed_text("").norm(), 0.0);
    }

    #[test]
    fn test_related_titles_are_closer() {
        let embedder = HashingTextEmbedder::new();
        let query = embedder.embed_text("高级软件工程师");
        let near = embedder.embed_text("软件工程师");
        let far = embedder.embed_text("餐厅服务员");
        let near_score = unit_cosine(&query.data, &near.data).unwrap();
        let far_score = unit_cosine(&query.data, &far.data).unwrap();
        assert!(near_score > far_score);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashingTextEmbedder::with_dimension(0).is_err());
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let embedder = HashingTextEmbedder::with_dimension(32).unwrap();
        let batch = embedder.embed_batch(&["会计", "出纳"]).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("会计").await.unwrap());
        assert_eq!(batch[1], embedder.embed("出纳").await.unwrap());
    }
}
