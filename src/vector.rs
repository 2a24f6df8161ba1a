//! Dense vectors and the embedding matrix used for similarity search.
//!
//! All similarity in occucode is cosine similarity. Rows stored in an
//! [`EmbeddingMatrix`] are unit-normalized on construction, so comparing two
//! rows reduces to a dot product.

pub mod matrix;
pub mod similarity;
pub mod vector;

pub use matrix::EmbeddingMatrix;
pub use vector::Vector;
