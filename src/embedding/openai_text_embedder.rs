//! OpenAI-compatible API text embedder.
//!
//! Requires the `embeddings-openai` feature. Works with any service exposing
//! the OpenAI `/embeddings` endpoint shape.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{OccucodeError, Result};
use crate::vector::Vector;

/// Request structure for the Embeddings API.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    /// Only sent when a non-default dimension was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    /// Position of the input this embedding belongs to.
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Embedder backed by an OpenAI-compatible HTTP API.
///
/// Each `embed_batch` call is a single request; the classifier already chunks
/// its inputs so no further splitting happens here.
///
/// # Examples
///
/// ```no_run
/// use occucode::embedding::text_embedder::TextEmbedder;
/// use occucode::embedding::openai_text_embedder::OpenAITextEmbedder;
///
/// # async fn example() -> occucode::error::Result<()> {
/// let embedder = OpenAITextEmbedder::new(
///     std::env::var("OPENAI_API_KEY").unwrap(),
///     "text-embedding-3-small".to_string(),
/// )?;
/// let vectors = embedder.embed_batch(&["软件工程师", "会计"]).await?;
/// # Ok(())
/// # }
/// ```
pub struct OpenAITextEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
}

impl std::fmt::Debug for OpenAITextEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAITextEmbedder")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl OpenAITextEmbedder {
    /// Create a new embedder for `model` against the public OpenAI API.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(OccucodeError::invalid_config("API key must not be empty"));
        }
        let dimension = Self::default_dimension(&model);
        Ok(Self {
            client: Client::new(),
            api_key,
            model,
            base_url: "https://api.openai.com/v1".to_string(),
            dimension,
        })
    }

    /// Point the embedder at another OpenAI-compatible service.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Request a reduced output dimension (supported by newer models).
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Default dimension: 3072 for the large model, 1536 otherwise.
    fn default_dimension(model: &str) -> usize {
        match model {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    fn requested_dimensions(&self) -> Option<usize> {
        (self.dimension != Self::default_dimension(&self.model)).then_some(self.dimension)
    }
}

#[async_trait]
impl TextEmbedder for OpenAITextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OccucodeError::embedding("No embedding in response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.requested_dimensions(),
        };

        let http_response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OccucodeError::embedding(format!("Embedding API request failed: {e}")))?;

        let status = http_response.status();
        let response_text = http_response.text().await.map_err(|e| {
            OccucodeError::embedding(format!("Failed to read response text: {e}"))
        })?;

        if !status.is_success() {
            return Err(OccucodeError::embedding(format!(
                "Embedding API error (status {status}): {response_text}"
            )));
        }

        let mut response: EmbeddingResponse = serde_json::from_str(&response_text)
            .map_err(|e| OccucodeError::embedding(format!("Failed to parse response: {e}")))?;

        if response.data.len() != texts.len() {
            return Err(OccucodeError::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|d| d.index);
        Ok(response
            .data
            .into_iter()
            .map(|d| Vector::new(d.embedding))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model
    }
}
