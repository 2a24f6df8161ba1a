//! Classifier configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::NormalizerConfig;
use crate::classifier::resolution::TierPolicy;
use crate::embedding::EmbedderConfig;
use crate::error::{OccucodeError, Result};

/// Configuration for [`OccupationClassifier`](crate::classifier::OccupationClassifier).
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Taxonomy version used when a call does not name one.
    pub version: String,
    /// Directory holding `{version}.csv` and `{version}_aliases.csv`.
    pub data_dir: PathBuf,
    /// Inputs embedded per provider call.
    pub batch_size: usize,
    /// Matches per input; `None` or 0 returns every surviving candidate.
    pub top_n: Option<usize>,
    /// Minimum similarity a candidate needs.
    pub threshold: Option<f32>,
    /// Apply the tier policy to resolved codes.
    pub hierarchical: bool,
    /// Add every taxonomy display name as an alias of its own code.
    pub complete_aliases: bool,
    /// Run alias text through the normalizer before embedding it.
    pub normalize_aliases: bool,
    pub tiers: TierPolicy,
    pub normalizer: NormalizerConfig,
    pub embedder: EmbedderConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            version: "csco22".to_string(),
            data_dir: PathBuf::from("data"),
            batch_size: 1000,
            top_n: Some(1),
            threshold: None,
            hierarchical: false,
            complete_aliases: true,
            normalize_aliases: false,
            tiers: TierPolicy::default(),
            normalizer: NormalizerConfig::default(),
            embedder: EmbedderConfig::default(),
        }
    }
}

impl ClassifierConfig {
    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(OccucodeError::invalid_config("version must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(OccucodeError::invalid_config("batch_size must be positive"));
        }
        if let Some(threshold) = self.threshold
            && !threshold.is_finite()
        {
            return Err(OccucodeError::invalid_config("threshold must be a finite number"));
        }
        self.tiers.validate()
    }

    /// Per-call options taken from this configuration.
    pub fn options(&self) -> ClassifyOptions {
        ClassifyOptions {
            top_n: self.top_n,
            threshold: self.threshold,
            hierarchical: self.hierarchical,
            batch_size: self.batch_size,
            version: None,
        }
    }
}

/// Knobs of a single classify call.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOptions {
    pub top_n: Option<usize>,
    pub threshold: Option<f32>,
    pub hierarchical: bool,
    pub batch_size: usize,
    /// Taxonomy version; `None` uses the configured one.
    pub version: Option<String>,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        ClassifierConfig::default().options()
    }
}

impl ClassifyOptions {
    pub fn with_top_n(mut self, top_n: Option<usize>) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_threshold(mut self, threshold: Option<f32>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_hierarchical(mut self, hierarchical: bool) -> Self {
        self.hierarchical = hierarchical;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The effective result limit; `None` means unlimited.
    pub fn limit(&self) -> Option<usize> {
        self.top_n.filter(|&n| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::analysis::char_filter::dictionary::BoundaryMode;
    use crate::embedding::EmbedderKind;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.version, "csco22");
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.top_n, Some(1));
        assert!(config.complete_aliases);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"version": "demo", "top_n": 3, "threshold": 0.5, "hierarchical": true,
                "embedder": {{"dimension": 128}}, "normalizer": {{"stopword_boundary": "ascii_aware"}}}}"#
        )
        .unwrap();

        let config = ClassifierConfig::from_file(file.path()).unwrap();
        assert_eq!(config.version, "demo");
        assert_eq!(config.top_n, Some(3));
        assert_eq!(config.threshold, Some(0.5));
        assert!(config.hierarchical);
        assert_eq!(config.embedder.kind, EmbedderKind::Hashing);
        assert_eq!(config.embedder.dimension, Some(128));
        assert_eq!(config.normalizer.stopword_boundary, BoundaryMode::AsciiAware);
        assert_eq!(config.normalizer.geo_boundary, BoundaryMode::Unicode);
        assert_eq!(config.batch_size, 1000);
    }

    #[test]
    fn test_invalid_batch_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"batch_size": 0}}"#).unwrap();
        assert!(matches!(
            ClassifierConfig::from_file(file.path()),
            Err(OccucodeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_options_limit() {
        let options = ClassifyOptions::default();
        assert_eq!(options.limit(), Some(1));
        assert_eq!(options.clone().with_top_n(Some(0)).limit(), None);
        assert_eq!(options.with_top_n(None).limit(), None);
    }
}
