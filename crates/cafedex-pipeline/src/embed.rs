//! Embedding stage: compose the canonical venue text and embed it in
//! batches, checkpointing after every batch.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cafedex_core::compose::compose_embedding_text;
use cafedex_core::models::{EmbeddingRecord, EnrichedVenue, TaxonomyTag};
use cafedex_core::ports::Embedder;
use cafedex_core::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedStats {
    pub total_input: usize,
    pub skipped_existing: usize,
    pub embedded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct EmbedOutcome {
    pub records: Vec<EmbeddingRecord>,
    pub stats: EmbedStats,
}

/// Embeds every venue not already present in `existing`, in batches of
/// `batch_size`. `persist` receives the full accumulated set after
/// every batch. A failed batch is logged and skipped; its venues are
/// picked up by the next run.
pub async fn run_embed(
    venues: &[EnrichedVenue],
    taxonomy: &[TaxonomyTag],
    embedder: &dyn Embedder,
    existing: Vec<EmbeddingRecord>,
    batch_size: usize,
    persist: &mut dyn FnMut(&[EmbeddingRecord]) -> Result<()>,
) -> Result<EmbedOutcome> {
    let done: HashSet<String> = existing.iter().map(|r| r.seed_id.clone()).collect();
    let mut records = existing;
    let mut stats = EmbedStats { total_input: venues.len(), ..EmbedStats::default() };

    let pending: Vec<&EnrichedVenue> = venues
        .iter()
        .filter(|v| {
            let fresh = !done.contains(&v.venue.seed_id);
            if !fresh {
                stats.skipped_existing += 1;
            }
            fresh
        })
        .collect();

    let batch_size = batch_size.max(1);
    for batch in pending.chunks(batch_size) {
        let texts: Vec<String> =
            batch.iter().map(|v| compose_embedding_text(v, taxonomy)).collect();

        let vectors = match embedder.embed(&texts).await {
            Ok(vectors) => vectors,
            Err(e) => {
                warn!(batch = batch.len(), error = %e, "embedding batch failed, skipping");
                stats.failed += batch.len();
                continue;
            }
        };
        if vectors.len() != batch.len() {
            warn!(
                expected = batch.len(),
                got = vectors.len(),
                "embedding count mismatch, skipping batch"
            );
            stats.failed += batch.len();
            continue;
        }

        let embedded_at = chrono::Utc::now().to_rfc3339();
        for ((venue, text), embedding) in batch.iter().zip(texts).zip(vectors) {
            records.push(EmbeddingRecord {
                seed_id: venue.venue.seed_id.clone(),
                place_id: venue.venue.place_id.clone(),
                name: venue.venue.name.clone(),
                embedding,
                embedded_text: text,
                model_id: embedder.model_name().to_string(),
                embedded_at: embedded_at.clone(),
            });
        }
        stats.embedded += batch.len();
        persist(&records)?;
    }

    info!(
        input = stats.total_input,
        skipped = stats.skipped_existing,
        embedded = stats.embedded,
        failed = stats.failed,
        "embedding complete"
    );

    Ok(EmbedOutcome { records, stats })
}
