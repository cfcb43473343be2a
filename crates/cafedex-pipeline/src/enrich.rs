//! Enrichment stage: one structured-generation call per venue,
//! validated against the curated taxonomy, checkpointed after every
//! venue.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cafedex_core::models::{
    EnrichableVenue, EnrichedVenue, EnrichmentMode, EnrichmentRecord, TagAssignment, TaxonomyTag,
};
use cafedex_core::ports::{StructuredGenerator, ToolSchema};
use cafedex_core::Result;

const SYSTEM_PROMPT: &str = "You are classifying coffee venues in Taipei for a search catalog. \
Assign only tags from the allowed taxonomy, with a confidence between 0 and 1 reflecting how \
strongly the reviews support the tag. Write a two-sentence summary capturing what makes the \
venue distinct, pick up to three review excerpts that best illustrate it, and choose the \
single usage mode the venue serves best.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichStats {
    pub total_input: usize,
    pub skipped_existing: usize,
    pub enriched: usize,
    pub failed: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Debug, Clone, Default)]
pub struct EnrichOptions {
    /// Index into the venue list to start at. A throughput knob for
    /// parallel manual runs, not a resume mechanism; resume is by id.
    pub start_from: usize,
    /// Stop after this many venues have been classified (dry runs).
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct EnrichOutcome {
    pub enriched: Vec<EnrichedVenue>,
    pub stats: EnrichStats,
}

/// Prompt body for one venue: structured facts first, then numbered
/// reviews, then the allowed taxonomy ids.
fn build_user_message(venue: &EnrichableVenue, taxonomy: &[TaxonomyTag]) -> String {
    let mut lines = vec![format!("Venue: {}", venue.name)];

    if !venue.categories.is_empty() {
        lines.push(format!("Categories: {}", venue.categories.join(", ")));
    }
    if let Some(price) = &venue.price_range {
        lines.push(format!("Price: {price}"));
    }
    lines.push(format!(
        "Power sockets: {} / Time limit: {}",
        venue.socket, venue.limited_time
    ));
    if let Some(rating) = venue.rating {
        lines.push(format!("Rating: {} ({} reviews)", rating, venue.review_count));
    }
    if let Some(description) = &venue.description {
        lines.push(format!("Description: {description}"));
    }

    if !venue.reviews.is_empty() {
        lines.push(String::new());
        lines.push("Reviews:".to_string());
        for (i, review) in venue.reviews.iter().enumerate() {
            lines.push(format!("{}. ({}★) {}", i + 1, review.stars, review.text));
        }
    }

    lines.push(String::new());
    lines.push("Allowed tags:".to_string());
    for tag in taxonomy {
        lines.push(format!(
            "{} ({}) - {} / {}",
            tag.id,
            tag.dimension.as_str(),
            tag.label,
            tag.label_zh
        ));
    }

    lines.join("\n")
}

fn classification_schema() -> ToolSchema {
    ToolSchema {
        name: "classify_venue".to_string(),
        description: "Classify one venue against the allowed tag taxonomy.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "tags": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "confidence": { "type": "number", "minimum": 0, "maximum": 1 }
                        },
                        "required": ["id", "confidence"]
                    }
                },
                "summary": { "type": "string" },
                "top_reviews": {
                    "type": "array",
                    "items": { "type": "string" },
                    "maxItems": 3
                },
                "mode": { "type": "string", "enum": ["work", "rest", "social", "mixed"] }
            },
            "required": ["tags", "summary", "top_reviews", "mode"]
        }),
    }
}

#[derive(Debug, Deserialize)]
struct RawTag {
    id: String,
    confidence: f64,
}

/// Classifier payload before validation.
#[derive(Debug, Deserialize)]
struct RawEnrichment {
    tags: Vec<RawTag>,
    summary: String,
    #[serde(default)]
    top_reviews: Vec<String>,
    mode: String,
}

/// Validates a raw classification: unknown tag ids are dropped,
/// confidences clamped to [0,1], an out-of-enum mode becomes mixed.
fn validate(
    raw: RawEnrichment,
    taxonomy: &[TaxonomyTag],
    model_id: &str,
    enriched_at: String,
) -> EnrichmentRecord {
    let known_ids: HashSet<&str> = taxonomy.iter().map(|t| t.id.as_str()).collect();

    let tags: Vec<TagAssignment> = raw
        .tags
        .into_iter()
        .filter(|t| {
            let known = known_ids.contains(t.id.as_str());
            if !known {
                warn!(tag = %t.id, "classifier proposed unknown tag, dropping");
            }
            known
        })
        .map(|t| TagAssignment { id: t.id, confidence: t.confidence.clamp(0.0, 1.0) })
        .collect();

    let mode = match raw.mode.as_str() {
        "work" => EnrichmentMode::Work,
        "rest" => EnrichmentMode::Rest,
        "social" => EnrichmentMode::Social,
        "mixed" => EnrichmentMode::Mixed,
        other => {
            warn!(mode = %other, "classifier returned unknown mode, using mixed");
            EnrichmentMode::Mixed
        }
    };

    EnrichmentRecord {
        tags,
        summary: raw.summary,
        top_reviews: raw.top_reviews,
        mode,
        enriched_at,
        model_id: model_id.to_string(),
    }
}

/// Runs the classifier over every venue not already enriched.
///
/// `existing` is the previous run's output; its venues are skipped by
/// seed id. `persist` receives the full accumulated set after every
/// successful venue, so an interrupted run loses at most the venue in
/// flight. Per-venue failures are logged and skipped.
pub async fn run_enrich(
    venues: &[EnrichableVenue],
    taxonomy: &[TaxonomyTag],
    generator: &dyn StructuredGenerator,
    existing: Vec<EnrichedVenue>,
    options: &EnrichOptions,
    persist: &mut dyn FnMut(&[EnrichedVenue]) -> Result<()>,
) -> Result<EnrichOutcome> {
    let done: HashSet<String> = existing.iter().map(|v| v.venue.seed_id.clone()).collect();
    let mut enriched = existing;
    let mut stats = EnrichStats { total_input: venues.len(), ..EnrichStats::default() };
    let schema = classification_schema();

    for venue in venues.iter().skip(options.start_from) {
        if done.contains(&venue.seed_id) {
            stats.skipped_existing += 1;
            continue;
        }
        if let Some(limit) = options.limit {
            if stats.enriched + stats.failed >= limit {
                break;
            }
        }

        let user_message = build_user_message(venue, taxonomy);
        let response = match generator.generate(SYSTEM_PROMPT, &user_message, &schema).await {
            Ok(response) => response,
            Err(e) => {
                warn!(seed_id = %venue.seed_id, error = %e, "enrichment call failed, skipping");
                stats.failed += 1;
                continue;
            }
        };
        stats.input_tokens += response.input_tokens;
        stats.output_tokens += response.output_tokens;

        let raw: RawEnrichment = match serde_json::from_value(response.output) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(seed_id = %venue.seed_id, error = %e, "unparseable classification, skipping");
                stats.failed += 1;
                continue;
            }
        };

        let record = validate(
            raw,
            taxonomy,
            generator.model_id(),
            chrono::Utc::now().to_rfc3339(),
        );
        info!(seed_id = %venue.seed_id, tags = record.tags.len(), "venue enriched");

        enriched.push(EnrichedVenue { venue: venue.clone(), enrichment: record });
        stats.enriched += 1;
        persist(&enriched)?;
    }

    info!(
        input = stats.total_input,
        skipped = stats.skipped_existing,
        enriched = stats.enriched,
        failed = stats.failed,
        input_tokens = stats.input_tokens,
        output_tokens = stats.output_tokens,
        "enrichment complete"
    );

    Ok(EnrichOutcome { enriched, stats })
}
