//! Text embedding support for similarity search.
//!
//! Titles and aliases are turned into dense vectors through the
//! [`TextEmbedder`] trait. Two implementations ship with the crate:
//!
//! - [`HashingTextEmbedder`] - deterministic character n-gram feature hashing.
//!   Needs no model files or network and is the default.
//! - `OpenAITextEmbedder` - any OpenAI-compatible `/embeddings` endpoint
//!   (requires the `embeddings-openai` feature).
//!
//! [`LazyTextEmbedder`] defers construction of the real provider until the
//! first text is embedded.

pub mod hashing;
pub mod lazy;
#[cfg(feature = "embeddings-openai")]
pub mod openai_text_embedder;
pub mod text_embedder;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use hashing::HashingTextEmbedder;
pub use lazy::LazyTextEmbedder;
#[cfg(feature = "embeddings-openai")]
pub use openai_text_embedder::OpenAITextEmbedder;
pub use text_embedder::TextEmbedder;

use crate::error::{OccucodeError, Result};

/// Embedding provider implementations selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedderKind {
    #[default]
    Hashing,
    #[serde(rename = "openai")]
    OpenAI,
}

/// Settings for the embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    pub kind: EmbedderKind,
    /// Model identifier sent to a remote provider.
    pub model: String,
    /// Output dimension. `None` uses the provider's default.
    pub dimension: Option<usize>,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            kind: EmbedderKind::Hashing,
            model: "text-embedding-3-small".to_string(),
            dimension: None,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl EmbedderConfig {
    /// Construct the configured provider.
    pub fn build(&self) -> Result<Arc<dyn TextEmbedder>> {
        match self.kind {
            EmbedderKind::Hashing => {
                let dimension = self
                    .dimension
                    .unwrap_or(hashing::DEFAULT_HASHING_DIMENSION);
                Ok(Arc::new(HashingTextEmbedder::with_dimension(dimension)?))
            }
            EmbedderKind::OpenAI => self.build_openai(),
        }
    }

    /// Wrap the configured provider so it is only constructed on first use.
    pub fn build_lazy(&self) -> LazyTextEmbedder {
        let config = self.clone();
        LazyTextEmbedder::new(self.display_name(), move || config.build())
    }

    /// Name of the configured provider for logs and reports.
    pub fn display_name(&self) -> String {
        match self.kind {
            EmbedderKind::Hashing => "hashing".to_string(),
            EmbedderKind::OpenAI => self.model.clone(),
        }
    }

    #[cfg(feature = "embeddings-openai")]
    fn build_openai(&self) -> Result<Arc<dyn TextEmbedder>> {
        let api_key = std::env::var(&self.api_key_env).map_err(|_| {
            OccucodeError::invalid_config(format!(
                "environment variable {} is not set",
                self.api_key_env
            ))
        })?;
        let embedder = OpenAITextEmbedder::new(api_key, self.model.clone())?
            .with_base_url(self.base_url.clone());
        let embedder = match self.dimension {
            Some(dimension) => embedder.with_dimension(dimension),
            None => embedder,
        };
        Ok(Arc::new(embedder))
    }

    #[cfg(not(feature = "embeddings-openai"))]
    fn build_openai(&self) -> Result<Arc<dyn TextEmbedder>> {
        Err(OccucodeError::invalid_config(
            "the openai embedder requires the `embeddings-openai` feature",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builds_hashing() {
        let embedder = EmbedderConfig::default().build().unwrap();
        assert_eq!(embedder.name(), "hashing");
        assert_eq!(embedder.dimension(), hashing::DEFAULT_HASHING_DIMENSION);
    }

    #[test]
    fn test_config_from_json() {
        let config: EmbedderConfig =
            serde_json::from_str(r#"{"kind": "hashing", "dimension": 64}"#).unwrap();
        assert_eq!(config.kind, EmbedderKind::Hashing);
        assert_eq!(config.build().unwrap().dimension(), 64);

        let config: EmbedderConfig = serde_json::from_str(r#"{"kind": "openai"}"#).unwrap();
        assert_eq!(config.kind, EmbedderKind::OpenAI);
    }

    #[cfg(not(feature = "embeddings-openai"))]
    #[test]
    fn test_openai_without_feature_is_config_error() {
        let config = EmbedderConfig {
            kind: EmbedderKind::OpenAI,
            ..EmbedderConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(OccucodeError::InvalidConfig(_))
        ));
    }
}
