//! Similarity primitives for unit-normalized vectors.
//!
//! Every row of an [`EmbeddingMatrix`](crate::vector::EmbeddingMatrix) has unit
//! length, so the dot product of two rows is their cosine similarity.

use crate::error::{OccucodeError, Result};

/// Below this many comparisons the rayon overhead outweighs the gain.
pub const PARALLEL_THRESHOLD: usize = 100;

/// Inner product of two vectors of equal length.
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(OccucodeError::InvalidOperation(format!(
            "Vector dimensions must match for similarity calculation: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Dot product of two unit vectors, clamped to `[-1, 1]` against rounding.
pub fn unit_cosine(a: &[f32], b: &[f32]) -> Result<f32> {
    Ok(dot(a, b)?.clamp(-1.0, 1.0))
}
