//! Post-processing stage: corpus-wide tag IDF, distinctiveness
//! scoring, and multi-mode inference. Pure transform, no provider
//! calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use cafedex_core::models::{
    EnrichedVenue, EnrichmentRecord, ProcessedEnrichment, ProcessedVenue, VenueMode,
};
use cafedex_core::scoring::{
    compute_tag_idf, infer_modes, score_tag_distinctiveness, MODE_CONFIDENCE_THRESHOLD,
};

/// How many tags the IDF extremes report on each end.
const IDF_REPORT_SIZE: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostprocessStats {
    pub total_venues: usize,
    pub average_tags_per_venue: f64,
    /// Venue counts per inferred mode (a venue counts once per mode it
    /// holds).
    pub mode_histogram: HashMap<String, usize>,
    /// Rarest tags: highest IDF first.
    pub most_distinctive_tags: Vec<(String, f64)>,
    /// Most ubiquitous tags: lowest IDF first.
    pub least_distinctive_tags: Vec<(String, f64)>,
}

#[derive(Debug, Clone)]
pub struct PostprocessOutcome {
    pub venues: Vec<ProcessedVenue>,
    pub stats: PostprocessStats,
}

fn mode_label(mode: VenueMode) -> &'static str {
    match mode {
        VenueMode::Work => "work",
        VenueMode::Rest => "rest",
        VenueMode::Social => "social",
        VenueMode::Coffee => "coffee",
    }
}

fn idf_extremes(idf: &HashMap<String, f64>) -> (Vec<(String, f64)>, Vec<(String, f64)>) {
    let mut sorted: Vec<(String, f64)> = idf.iter().map(|(k, v)| (k.clone(), *v)).collect();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let most = sorted.iter().take(IDF_REPORT_SIZE).cloned().collect();
    let least = sorted.iter().rev().take(IDF_REPORT_SIZE).cloned().collect();
    (most, least)
}

/// Scores every venue's tags against the corpus and infers its usage
/// modes.
pub fn run_postprocess(venues: &[EnrichedVenue]) -> PostprocessOutcome {
    let records: Vec<EnrichmentRecord> =
        venues.iter().map(|v| v.enrichment.clone()).collect();
    let idf = compute_tag_idf(&records);

    let mut processed = Vec::with_capacity(venues.len());
    let mut total_tags = 0usize;
    let mut mode_histogram: HashMap<String, usize> = HashMap::new();

    for venue in venues {
        let tags = score_tag_distinctiveness(&venue.enrichment.tags, &idf);
        let modes = infer_modes(
            &venue.enrichment.tags,
            venue.enrichment.mode,
            MODE_CONFIDENCE_THRESHOLD,
        );
        total_tags += tags.len();
        for mode in &modes {
            *mode_histogram.entry(mode_label(*mode).to_string()).or_insert(0) += 1;
        }

        processed.push(ProcessedVenue {
            venue: venue.venue.clone(),
            enrichment: ProcessedEnrichment {
                tags,
                summary: venue.enrichment.summary.clone(),
                top_reviews: venue.enrichment.top_reviews.clone(),
                modes,
                enriched_at: venue.enrichment.enriched_at.clone(),
                model_id: venue.enrichment.model_id.clone(),
            },
        });
    }

    let (most_distinctive_tags, least_distinctive_tags) = idf_extremes(&idf);
    let stats = PostprocessStats {
        total_venues: venues.len(),
        average_tags_per_venue: if venues.is_empty() {
            0.0
        } else {
            total_tags as f64 / venues.len() as f64
        },
        mode_histogram,
        most_distinctive_tags,
        least_distinctive_tags,
    };

    info!(
        venues = stats.total_venues,
        avg_tags = stats.average_tags_per_venue,
        "postprocess complete"
    );

    PostprocessOutcome { venues: processed, stats }
}
