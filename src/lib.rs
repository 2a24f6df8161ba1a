//! # occucode
//!
//! Classifies noisy, free-text Chinese job titles into a hierarchical
//! occupational taxonomy.
//!
//! ## Pipeline
//!
//! - Rule-based title cleaning ([`analysis`])
//! - Text embedding behind a pluggable provider ([`embedding`])
//! - Cosine nearest-alias search against a per-version reference index
//!   ([`classifier`], [`vector`])
//! - Confidence-tiered fallback to coarser codes for weak matches

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod embedding;
pub mod error;
pub mod taxonomy;
pub mod vector;

pub mod prelude {
    pub use crate::analysis::normalizer::{JobTitleNormalizer, NormalizerConfig};
    pub use crate::classifier::{
        ClassificationRecord, ClassifiedTitle, ClassifierConfig, ClassifyInput, ClassifyOptions,
        MatchResult, OccupationClassifier, TierPolicy,
    };
    pub use crate::embedding::{EmbedderConfig, HashingTextEmbedder, TextEmbedder};
    pub use crate::error::{OccucodeError, Result};
    pub use crate::taxonomy::{
        AliasEntry, CsvReferenceData, InMemoryReferenceData, ReferenceDataSource, TaxonomyEntry,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
