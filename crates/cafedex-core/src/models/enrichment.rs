use serde::{Deserialize, Serialize};

use super::venue::EnrichableVenue;

/// Coarse single mode emitted by the enrichment classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentMode {
    Work,
    Rest,
    Social,
    /// Non-actionable catch-all; the post-processor maps it to rest
    /// when no signal tags qualify.
    Mixed,
}

/// Usage mode after post-processing. Multi-label; `Mixed` never
/// survives this far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueMode {
    Work,
    Rest,
    Social,
    Coffee,
}

impl VenueMode {
    /// Fixed enumeration order for mode inference output.
    pub const ALL: [VenueMode; 4] = [
        VenueMode::Work,
        VenueMode::Rest,
        VenueMode::Social,
        VenueMode::Coffee,
    ];
}

/// A taxonomy tag assigned to a venue with the classifier's confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagAssignment {
    pub id: String,
    pub confidence: f64,
}

/// Tag assignment augmented with corpus-relative distinctiveness
/// (confidence x idf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredTag {
    pub id: String,
    pub confidence: f64,
    pub distinctiveness: f64,
}

/// Per-venue classifier output, validated against the taxonomy before
/// acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub tags: Vec<TagAssignment>,
    pub summary: String,
    pub top_reviews: Vec<String>,
    pub mode: EnrichmentMode,
    pub enriched_at: String,
    pub model_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedVenue {
    #[serde(flatten)]
    pub venue: EnrichableVenue,
    pub enrichment: EnrichmentRecord,
}

/// Post-processed enrichment: tags scored and sorted by
/// distinctiveness, modes inferred from signal tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedEnrichment {
    pub tags: Vec<ScoredTag>,
    pub summary: String,
    pub top_reviews: Vec<String>,
    pub modes: Vec<VenueMode>,
    pub enriched_at: String,
    pub model_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedVenue {
    #[serde(flatten)]
    pub venue: EnrichableVenue,
    pub enrichment: ProcessedEnrichment,
}
