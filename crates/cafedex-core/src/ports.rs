//! Port trait definitions for the three external providers.
//!
//! Adapters live in `cafedex-providers`; the pipeline stages only ever
//! see these traits, so tests swap in in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CandidatePlace;

/// Port for the place-search/geocoding provider.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Cheap search by free-text terms. No reviews or photos.
    async fn search(
        &self,
        search_terms: &[String],
        max_results_per_term: u32,
    ) -> Result<Vec<CandidatePlace>>;

    /// Full-detail scrape keyed by provider place id. Deterministic:
    /// identity is by id, not fuzzy matching.
    async fn scrape_by_ids(
        &self,
        place_ids: &[String],
        max_reviews: u32,
        max_images: u32,
    ) -> Result<Vec<CandidatePlace>>;
}

/// Structured output from the generation provider plus token usage.
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    /// The tool-call payload, validated by the caller before it enters
    /// the typed domain model.
    pub output: serde_json::Value,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Schema handed to the structured-generation provider; the provider
/// is forced to answer through this tool.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool input.
    pub input_schema: serde_json::Value,
}

/// Port for the structured-generation language-model provider.
///
/// A response without the expected structured block is a hard failure
/// ([`crate::CafedexError::MissingStructuredOutput`]), never silently
/// ignored.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: &ToolSchema,
    ) -> Result<StructuredResponse>;

    /// Identifier of the underlying model, recorded as provenance.
    fn model_id(&self) -> &str;
}

/// Port for the text-embedding provider.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a batch of texts, returning one vector per input in
    /// input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Identifier of the embedding model, recorded as provenance.
    fn model_name(&self) -> &str;
}
