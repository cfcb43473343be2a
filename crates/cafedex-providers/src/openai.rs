//! Embedding adapter for the OpenAI embeddings API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cafedex_core::error::Result;
use cafedex_core::ports::Embedder;

use crate::retry::{provider_error, status_error, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI-backed [`Embedder`] implementation.
pub struct OpenAiEmbedder {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl OpenAiEmbedder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client: reqwest::Client::new(),
            retry,
        }
    }

    /// Override the API base URL (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingsRequest { model: self.model.clone(), input: texts.to_vec() };

        let response: EmbeddingsResponse = self
            .retry
            .run(|| async {
                let response = self
                    .client
                    .post(format!("{}/v1/embeddings", self.base_url))
                    .bearer_auth(&self.api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| provider_error("OpenAI request", e))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(status_error("OpenAI embeddings", status.as_u16(), &body));
                }

                response
                    .json::<EmbeddingsResponse>()
                    .await
                    .map_err(|e| provider_error("OpenAI response parse", e))
            })
            .await?;

        // The API may reorder entries; sort by index to preserve input
        // order.
        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ─── Wire types ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingEntry {
    index: usize,
    embedding: Vec<f32>,
}
