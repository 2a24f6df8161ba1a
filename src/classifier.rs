//! Job-title classification.
//!
//! [`OccupationClassifier`] ties the pieces together: titles are cleaned by
//! the [`JobTitleNormalizer`](crate::analysis::normalizer::JobTitleNormalizer),
//! embedded by a [`TextEmbedder`](crate::embedding::TextEmbedder) and matched
//! against the cached [`ReferenceIndex`] of a taxonomy version.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use occucode::classifier::{ClassifierConfig, OccupationClassifier};
//! use occucode::embedding::HashingTextEmbedder;
//! use occucode::taxonomy::{AliasEntry, InMemoryReferenceData, TaxonomyEntry};
//!
//! # async fn example() -> occucode::error::Result<()> {
//! let data = InMemoryReferenceData::new().with_version(
//!     "csco22",
//!     vec![TaxonomyEntry::new("2-06-07-02", "会计专业人员")],
//!     vec![AliasEntry::new("会计", "2-06-07-02", "会计专业人员")],
//! );
//! let classifier = OccupationClassifier::new(
//!     ClassifierConfig::default(),
//!     Arc::new(HashingTextEmbedder::new()),
//!     Arc::new(data),
//! )?;
//!
//! let options = classifier.default_options();
//! let matches = classifier.classify_one("急招，会计，双休", &options).await?;
//! assert_eq!(matches[0].code, "2060702");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod index;
pub mod input;
pub mod matcher;
pub mod occupation_classifier;
pub mod resolution;
pub mod result;

pub use config::{ClassifierConfig, ClassifyOptions};
pub use index::{IndexOptions, ReferenceIndex, ReferenceIndexCache};
pub use input::ClassifyInput;
pub use matcher::SimilarityMatcher;
pub use occupation_classifier::OccupationClassifier;
pub use resolution::{Tier, TierPolicy};
pub use result::{ClassificationRecord, ClassifiedTitle, MatchResult, flatten};
