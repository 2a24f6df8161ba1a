//! Job-title normalizer.
//!
//! Chains the char filters in a fixed order. The order is significant: each
//! stage assumes the noise handled by earlier stages is already gone, and
//! removals change the word-boundary context seen by later stages.
//!
//! 1. Recruitment boilerplate (perks, pay, schedules)
//! 2. Stop words
//! 3. The bare recruiting verb
//! 4. Posting reference codes
//! 5. Geographic entities
//! 6. Punctuation
//! 7. Whitespace collapse and trim
//!
//! The chain is repeated until the text stops changing, so the result is a
//! fixed point: normalizing a normalized title returns it unchanged. After the
//! first pass every stage can only delete characters, so each further pass
//! either shortens the text or ends the loop.
//!
//! # Examples
//!
//! ```
//! use occucode::analysis::normalizer::JobTitleNormalizer;
//!
//! let normalizer = JobTitleNormalizer::new().unwrap();
//! assert_eq!(
//!     normalizer.normalize("提供吃住社保，月入过万，招聘专员J10050，北京市"),
//!     "招聘专员"
//! );
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::char_filter::CharFilter;
use crate::analysis::char_filter::boilerplate::{BoilerplateCharFilter, BoilerplateRule};
use crate::analysis::char_filter::code_token::{CodeTokenCharFilter, DEFAULT_CODE_WHITELIST};
use crate::analysis::char_filter::dictionary::{BoundaryMode, DictionaryCharFilter};
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::char_filter::recruitment_verb::{
    DEFAULT_RECRUITMENT_TERM, DEFAULT_RECRUITMENT_WHITELIST, RecruitmentVerbCharFilter,
};
use crate::analysis::char_filter::whitespace::WhitespaceCharFilter;
use crate::analysis::lexicon::Lexicon;
use crate::error::Result;

/// Anything that is neither a word character nor whitespace.
const PUNCTUATION_PATTERN: &str = r"[^\w\s]";

/// Settings for [`JobTitleNormalizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Stop-word list replacing the bundled one (one term per line).
    pub stopwords_path: Option<PathBuf>,
    /// Geographic entity table replacing the bundled one (`name,short_name` CSV).
    pub geo_entities_path: Option<PathBuf>,
    /// Stop words added on top of the loaded list.
    pub extra_stopwords: Vec<String>,
    /// Extra boilerplate patterns, applied after the built-in rules.
    pub extra_boilerplate_patterns: Vec<String>,
    /// The recruiting verb removed in stage 3.
    pub recruitment_term: String,
    /// Compounds containing the recruiting verb that must survive.
    pub recruitment_whitelist: Vec<String>,
    /// Alphanumeric tokens that are never treated as posting codes.
    pub code_whitelist: Vec<String>,
    /// Word-boundary handling for stop words. `AsciiAware` also removes
    /// CJK stop words glued to other text.
    pub stopword_boundary: BoundaryMode,
    pub geo_boundary: BoundaryMode,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            stopwords_path: None,
            geo_entities_path: None,
            extra_stopwords: Vec::new(),
            extra_boilerplate_patterns: Vec::new(),
            recruitment_term: DEFAULT_RECRUITMENT_TERM.to_string(),
            recruitment_whitelist: DEFAULT_RECRUITMENT_WHITELIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            code_whitelist: DEFAULT_CODE_WHITELIST.iter().map(|s| s.to_string()).collect(),
            stopword_boundary: BoundaryMode::Unicode,
            geo_boundary: BoundaryMode::Unicode,
        }
    }
}

/// Rule-based cleaner turning a noisy job title into the text that is embedded.
///
/// Construction compiles every pattern once; `normalize` is a pure function of
/// its input and safe to call from many threads.
#[derive(Clone)]
pub struct JobTitleNormalizer {
    stages: Vec<Arc<dyn CharFilter>>,
}

impl std::fmt::Debug for JobTitleNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobTitleNormalizer")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl JobTitleNormalizer {
    /// Build a normalizer with the bundled lexicon and default rules.
    pub fn new() -> Result<Self> {
        Self::from_config(&NormalizerConfig::default())
    }

    /// Build a normalizer from configuration, loading lexicon files if given.
    pub fn from_config(config: &NormalizerConfig) -> Result<Self> {
        let lexicon = Lexicon::from_paths(
            config.stopwords_path.as_deref(),
            config.geo_entities_path.as_deref(),
        )?
        .with_extra_stopwords(config.extra_stopwords.iter().cloned());
        Self::with_lexicon(config, &lexicon)
    }

    /// Build a normalizer from configuration and an already-loaded lexicon.
    pub fn with_lexicon(config: &NormalizerConfig, lexicon: &Lexicon) -> Result<Self> {
        let mut boilerplate = BoilerplateCharFilter::new()?;
        for (i, pattern) in config.extra_boilerplate_patterns.iter().enumerate() {
            boilerplate = boilerplate.add_rule(BoilerplateRule::new(format!("extra_{i}"), pattern)?);
        }

        let stages: Vec<Arc<dyn CharFilter>> = vec![
            Arc::new(boilerplate),
            Arc::new(DictionaryCharFilter::new(
                "stopwords",
                &lexicon.stopwords,
                config.stopword_boundary,
            )?),
            Arc::new(RecruitmentVerbCharFilter::with_whitelist(
                &config.recruitment_term,
                config.recruitment_whitelist.as_slice(),
            )?),
            Arc::new(CodeTokenCharFilter::with_whitelist(config.code_whitelist.as_slice())?),
            Arc::new(DictionaryCharFilter::new(
                "geo_entities",
                &lexicon.geo_entities,
                config.geo_boundary,
            )?),
            Arc::new(PatternReplaceCharFilter::remove(PUNCTUATION_PATTERN)?),
            Arc::new(WhitespaceCharFilter::new()),
        ];

        Ok(Self { stages })
    }

    /// Names of the stages, in application order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage once.
    fn apply_once(&self, text: &str) -> String {
        self.stages
            .iter()
            .fold(text.to_string(), |acc, stage| stage.filter(&acc))
    }

    /// Clean a raw job title. Returns an empty string when nothing meaningful
    /// remains.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.apply_once(raw);
        // A changing pass removes at least one character.
        for _ in 0..=current.chars().count() {
            let next = self.apply_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
        debug!("normalizer did not settle for {raw:?}");
        current
    }

    /// Clean an optional title; a missing value yields an empty string.
    pub fn normalize_opt(&self, raw: Option<&str>) -> String {
        raw.map(|r| self.normalize(r)).unwrap_or_default()
    }
}
