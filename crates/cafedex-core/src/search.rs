//! Hybrid ranking: cosine similarity plus keyword-derived taxonomy
//! boost. Used by the offline search evaluator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CafedexError, Result};
use crate::models::{ScoredTag, TaxonomyTag};

/// Additive ranking credit per matched taxonomy tag.
pub const BOOST_PER_TAG: f64 = 0.05;

/// Cosine similarity of two vectors.
///
/// Returns 0 (not NaN) when either vector has zero magnitude; errors on
/// length mismatch.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(CafedexError::VectorLengthMismatch { left: a.len(), right: b.len() });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// True when `needle` occurs in `haystack` as a whole word: the
/// characters on both sides of the occurrence are not alphanumeric.
/// Keeps a short English label like "work" from matching "network".
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();

        let boundary_before = haystack[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let boundary_after = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());

        if boundary_before && boundary_after {
            return true;
        }
        start = end;
    }

    false
}

/// Keyword-derived boost of a query against the tags a venue actually
/// holds.
///
/// Chinese labels match by substring (no word boundaries in Chinese);
/// English labels match as whole words, case-insensitively. Each
/// matched tag contributes `boost_per_tag` additively with no cap.
/// Tags the venue does not hold can never match, regardless of what
/// the query says.
pub fn compute_taxonomy_boost(
    query: &str,
    venue_tags: &[ScoredTag],
    taxonomy: &[TaxonomyTag],
    boost_per_tag: f64,
) -> TaxonomyBoost {
    let tag_map: HashMap<&str, &TaxonomyTag> =
        taxonomy.iter().map(|t| (t.id.as_str(), t)).collect();
    let query_lower = query.to_lowercase();

    let mut matched_tag_ids = Vec::new();
    for venue_tag in venue_tags {
        let Some(tag) = tag_map.get(venue_tag.id.as_str()) else {
            continue;
        };

        let chinese_match = query.contains(&tag.label_zh);
        let english_match = contains_whole_word(&query_lower, &tag.label.to_lowercase());

        if chinese_match || english_match {
            matched_tag_ids.push(tag.id.clone());
        }
    }

    TaxonomyBoost {
        boost: matched_tag_ids.len() as f64 * boost_per_tag,
        matched_tag_ids,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyBoost {
    pub boost: f64,
    pub matched_tag_ids: Vec<String>,
}

/// A venue entering the ranker: name, raw cosine similarity, held tags.
#[derive(Debug, Clone)]
pub struct RankCandidate {
    pub name: String,
    pub score: f64,
    pub tags: Vec<ScoredTag>,
}

/// One ranked search result, with matched tag ids for explainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub rank: usize,
    pub name: String,
    pub score: f64,
    pub boosted_score: f64,
    pub matched_tag_ids: Vec<String>,
}

/// Ranks candidates by boosted score (cosine + taxonomy boost),
/// descending, with ranks assigned from 1.
pub fn rank_results(
    query: &str,
    candidates: &[RankCandidate],
    taxonomy: &[TaxonomyTag],
) -> Vec<RankedResult> {
    let mut scored: Vec<RankedResult> = candidates
        .iter()
        .map(|c| {
            let TaxonomyBoost { boost, matched_tag_ids } =
                compute_taxonomy_boost(query, &c.tags, taxonomy, BOOST_PER_TAG);
            RankedResult {
                rank: 0,
                name: c.name.clone(),
                score: c.score,
                boosted_score: c.score + boost,
                matched_tag_ids,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.boosted_score
            .partial_cmp(&a.boosted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, result) in scored.iter_mut().enumerate() {
        result.rank = i + 1;
    }

    scored
}
