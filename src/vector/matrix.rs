//! Row-major matrix of unit-normalized embeddings.

use rayon::prelude::*;

use crate::error::{OccucodeError, Result};
use crate::vector::Vector;
use crate::vector::similarity::{PARALLEL_THRESHOLD, unit_cosine};

/// A dense `rows x dimension` matrix whose rows have unit length (or are all
/// zero). Built once per reference index and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingMatrix {
    data: Vec<f32>,
    rows: usize,
    dimension: usize,
}

impl EmbeddingMatrix {
    /// Stack vectors into a matrix, normalizing each row.
    ///
    /// Every vector must have the same dimension and contain only finite
    /// values.
    pub fn from_vectors(vectors: Vec<Vector>) -> Result<Self> {
        let dimension = vectors.first().map(Vector::dimension).unwrap_or(0);
        let rows = vectors.len();
        let mut data = Vec::with_capacity(rows * dimension);

        for (i, mut vector) in vectors.into_iter().enumerate() {
            vector.validate_dimension(dimension).map_err(|_| {
                OccucodeError::InvalidOperation(format!(
                    "Embedding {i} has dimension {}, expected {dimension}",
                    vector.dimension()
                ))
            })?;
            if !vector.is_valid() {
                return Err(OccucodeError::embedding(format!(
                    "Embedding {i} contains NaN or infinite values"
                )));
            }
            vector.normalize();
            data.extend_from_slice(&vector.data);
        }

        Ok(Self {
            data,
            rows,
            dimension,
        })
    }

    /// Build from raw rows.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        Self::from_vectors(rows.into_iter().map(Vector::new).collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i`, or `None` when out of range.
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i >= self.rows {
            return None;
        }
        let start = i * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    /// Iterate rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        let dimension = self.dimension;
        (0..self.rows).map(move |i| &self.data[i * dimension..(i + 1) * dimension])
    }

    /// Cosine similarity of every row in `queries` against every row of
    /// `self`. The result has one inner vector per query, each of length
    /// `self.rows()`.
    pub fn similarity_matrix(&self, queries: &EmbeddingMatrix) -> Result<Vec<Vec<f32>>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        if queries.dimension != self.dimension {
            return Err(OccucodeError::InvalidOperation(format!(
                "Query dimension {} does not match reference dimension {}",
                queries.dimension, self.dimension
            )));
        }

        let score_row = |query: &[f32]| -> Result<Vec<f32>> {
            self.iter_rows().map(|row| unit_cosine(query, row)).collect()
        };

        let queries: Vec<&[f32]> = queries.iter_rows().collect();
        if queries.len() * self.rows < PARALLEL_THRESHOLD {
            queries.into_iter().map(score_row).collect()
        } else {
            queries.into_par_iter().map(score_row).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_normalized() {
        let matrix = EmbeddingMatrix::from_rows(vec![vec![3.0, 4.0], vec![0.0, 2.0]]).unwrap();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.dimension(), 2);
        let first = matrix.row(0).unwrap();
        assert!((first[0] - 0.6).abs() < 1e-6);
        assert!((first[1] - 0.8).abs() < 1e-6);
        assert!(matrix.row(2).is_none());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(result, Err(OccucodeError::InvalidOperation(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = EmbeddingMatrix::from_rows(vec![vec![f32::INFINITY, 0.0]]);
        assert!(matches!(result, Err(OccucodeError::Embedding(_))));
    }

    #[test]
    fn test_similarity_matrix() {
        let refs = EmbeddingMatrix::from_rows(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ])
        .unwrap();
        let queries = EmbeddingMatrix::from_rows(vec![vec![2.0, 0.0]]).unwrap();
        let scores = refs.similarity_matrix(&queries).unwrap();
        assert_eq!(scores.len(), 1);
        assert!((scores[0][0] - 1.0).abs() < 1e-6);
        assert!(scores[0][1].abs() < 1e-6);
        assert!((scores[0][2] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert_eq!(scores[0][3], 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let refs = EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        let queries = EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0, 0.0]]).unwrap();
        assert!(refs.similarity_matrix(&queries).is_err());
    }
}
