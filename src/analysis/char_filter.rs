//! Char filter implementations for job-title normalization.
//!
//! A char filter rewrites the raw string before it reaches the embedding
//! provider. Every filter in this module only ever deletes text (or folds
//! whitespace), which is what lets [`JobTitleNormalizer`] iterate the chain to
//! a fixed point.
//!
//! # Available Filters
//!
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//! - [`boilerplate::BoilerplateCharFilter`] - Ordered recruitment-noise rules
//! - [`dictionary::DictionaryCharFilter`] - Whole-word removal of a term list
//! - [`recruitment_verb::RecruitmentVerbCharFilter`] - Drops the bare recruiting verb
//! - [`code_token::CodeTokenCharFilter`] - Drops posting reference codes
//! - [`whitespace::WhitespaceCharFilter`] - Collapses and trims whitespace
//!
//! # Examples
//!
//! ```
//! use occucode::analysis::char_filter::CharFilter;
//! use occucode::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
//!
//! let filter = PatternReplaceCharFilter::new(r"[^\w\s]", "").unwrap();
//! assert_eq!(filter.filter("你好！世界？"), "你好世界");
//! ```
//!
//! [`JobTitleNormalizer`]: crate::analysis::normalizer::JobTitleNormalizer

/// Trait for character filters that transform text before embedding.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text, returning the filtered text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod boilerplate;
pub mod code_token;
pub mod dictionary;
pub mod pattern_replace;
pub mod recruitment_verb;
pub mod whitespace;
