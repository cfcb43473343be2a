//! Search evaluation stage: embed a fixed query set and rank the
//! catalog with the hybrid scorer. The report is reviewed manually:
//! the quality gate is human judgment, not an automated metric.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cafedex_core::models::{EmbeddingRecord, ProcessedVenue, ScoredTag, TaxonomyTag};
use cafedex_core::ports::Embedder;
use cafedex_core::search::{cosine_similarity, rank_results, RankCandidate, RankedResult};
use cafedex_core::Result;

/// Results kept per query.
pub const TOP_K: usize = 5;

/// One evaluation query with its intent category (for the reviewer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub category: String,
}

/// Ranked report entry for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReport {
    pub query: String,
    pub category: String,
    pub results: Vec<RankedResult>,
}

/// Runs every query against the embedded catalog and keeps the top K.
///
/// A query whose embedding call fails is logged and skipped; the rest
/// of the report still gets written.
pub async fn run_search_eval(
    queries: &[SearchQuery],
    embeddings: &[EmbeddingRecord],
    processed: &[ProcessedVenue],
    taxonomy: &[TaxonomyTag],
    embedder: &dyn Embedder,
    top_k: usize,
) -> Result<Vec<QueryReport>> {
    let tags_by_seed_id: HashMap<&str, &[ScoredTag]> = processed
        .iter()
        .map(|v| (v.venue.seed_id.as_str(), v.enrichment.tags.as_slice()))
        .collect();

    let mut reports = Vec::with_capacity(queries.len());

    for query in queries {
        let vectors = match embedder.embed(std::slice::from_ref(&query.query)).await {
            Ok(vectors) => vectors,
            Err(e) => {
                warn!(query = %query.query, error = %e, "query embedding failed, skipping");
                continue;
            }
        };
        let Some(query_vector) = vectors.first() else {
            warn!(query = %query.query, "embedder returned no vector, skipping");
            continue;
        };

        let mut candidates = Vec::with_capacity(embeddings.len());
        for record in embeddings {
            let score = cosine_similarity(query_vector, &record.embedding)?;
            candidates.push(RankCandidate {
                name: record.name.clone(),
                score,
                tags: tags_by_seed_id
                    .get(record.seed_id.as_str())
                    .map(|t| t.to_vec())
                    .unwrap_or_default(),
            });
        }

        let mut ranked = rank_results(&query.query, &candidates, taxonomy);
        ranked.truncate(top_k);

        info!(
            query = %query.query,
            category = %query.category,
            top = ranked.first().map(|r| r.name.as_str()).unwrap_or("-"),
            "query evaluated"
        );

        reports.push(QueryReport {
            query: query.query.clone(),
            category: query.category.clone(),
            results: ranked,
        });
    }

    Ok(reports)
}
