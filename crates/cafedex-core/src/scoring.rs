//! Corpus-wide tag distinctiveness and usage-mode inference.

use std::collections::{HashMap, HashSet};

use crate::models::{EnrichmentMode, EnrichmentRecord, ScoredTag, TagAssignment, VenueMode};

/// Minimum confidence for a signal tag to trigger its mode.
pub const MODE_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Curated signal tag ids per mode, in the fixed enumeration order.
fn mode_signals(mode: VenueMode) -> &'static [&'static str] {
    match mode {
        VenueMode::Work => &[
            "deep_work",
            "casual_work",
            "laptop_friendly",
            "power_outlets",
            "wifi_available",
            "no_time_limit",
            "late_night_work",
        ],
        VenueMode::Rest => &[
            "reading",
            "solo_time",
            "slow_morning",
            "healing_therapeutic",
            "quiet",
        ],
        VenueMode::Social => &[
            "catch_up_friends",
            "small_group",
            "date",
            "lively",
            "community_vibe",
        ],
        VenueMode::Coffee => &[
            "specialty_coffee_focused",
            "coffee_tasting",
            "roastery_onsite",
        ],
    }
}

/// Inverse document frequency per tag across all enrichment records.
///
/// df(tag) counts distinct venues holding the tag; duplicate entries
/// inside one venue's record count once. idf = ln(N / df): zero for a
/// tag every venue holds, growing as the tag becomes rarer, never
/// negative.
pub fn compute_tag_idf(enrichments: &[EnrichmentRecord]) -> HashMap<String, f64> {
    let n = enrichments.len() as f64;
    let mut df: HashMap<&str, usize> = HashMap::new();

    for record in enrichments {
        let distinct: HashSet<&str> = record.tags.iter().map(|t| t.id.as_str()).collect();
        for id in distinct {
            *df.entry(id).or_insert(0) += 1;
        }
    }

    df.into_iter()
        .map(|(id, count)| (id.to_string(), (n / count as f64).ln()))
        .collect()
}

/// Scores each tag as confidence x idf and sorts descending by
/// distinctiveness. A tag absent from the idf map scores 0.
pub fn score_tag_distinctiveness(
    tags: &[TagAssignment],
    idf: &HashMap<String, f64>,
) -> Vec<ScoredTag> {
    let mut scored: Vec<ScoredTag> = tags
        .iter()
        .map(|t| ScoredTag {
            id: t.id.clone(),
            confidence: t.confidence,
            distinctiveness: t.confidence * idf.get(&t.id).copied().unwrap_or(0.0),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.distinctiveness
            .partial_cmp(&a.distinctiveness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}

/// Infers usage modes from signal tags.
///
/// A mode qualifies when the venue holds at least one of its signal
/// tags at confidence >= `threshold`. Output follows the fixed order
/// work -> rest -> social -> coffee, regardless of input tag order.
/// With no qualifying mode, falls back to the classifier's single
/// mode, substituting rest for the non-actionable mixed.
pub fn infer_modes(
    tags: &[TagAssignment],
    original_mode: EnrichmentMode,
    threshold: f64,
) -> Vec<VenueMode> {
    let confidence_by_id: HashMap<&str, f64> =
        tags.iter().map(|t| (t.id.as_str(), t.confidence)).collect();

    let mut modes: Vec<VenueMode> = Vec::new();
    for mode in VenueMode::ALL {
        let qualifies = mode_signals(mode)
            .iter()
            .any(|id| confidence_by_id.get(id).copied().unwrap_or(0.0) >= threshold);
        if qualifies {
            modes.push(mode);
        }
    }

    if modes.is_empty() {
        modes.push(match original_mode {
            EnrichmentMode::Work => VenueMode::Work,
            EnrichmentMode::Rest | EnrichmentMode::Mixed => VenueMode::Rest,
            EnrichmentMode::Social => VenueMode::Social,
        });
    }

    modes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: &str, confidence: f64) -> TagAssignment {
        TagAssignment { id: id.to_string(), confidence }
    }

    fn record(tags: Vec<TagAssignment>) -> EnrichmentRecord {
        EnrichmentRecord {
            tags,
            summary: String::new(),
            top_reviews: Vec::new(),
            mode: EnrichmentMode::Mixed,
            enriched_at: String::new(),
            model_id: String::new(),
        }
    }

    #[test]
    fn idf_zero_for_universal_tag() {
        let records = vec![
            record(vec![tag("quiet", 0.9)]),
            record(vec![tag("quiet", 0.8)]),
        ];
        let idf = compute_tag_idf(&records);
        assert!(idf["quiet"].abs() < 1e-9);
    }

    #[test]
    fn idf_ln2_for_tag_in_one_of_two() {
        let records = vec![
            record(vec![tag("quiet", 0.9), tag("has_cats", 0.7)]),
            record(vec![tag("quiet", 0.8)]),
        ];
        let idf = compute_tag_idf(&records);
        assert!((idf["has_cats"] - 2.0f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn idf_counts_duplicate_tags_within_one_venue_once() {
        // Both venues hold "quiet"; one lists it twice. df must still
        // be 2 of 2, so idf stays at zero (never negative).
        let records = vec![
            record(vec![tag("quiet", 0.9), tag("quiet", 0.5)]),
            record(vec![tag("quiet", 0.8)]),
        ];
        let idf = compute_tag_idf(&records);
        assert!(idf["quiet"] >= 0.0);
        assert!(idf["quiet"].abs() < 1e-9);
    }

    #[test]
    fn distinctiveness_sorts_descending() {
        let mut idf = HashMap::new();
        idf.insert("rare".to_string(), 2.0);
        idf.insert("common".to_string(), 0.1);

        let scored = score_tag_distinctiveness(
            &[tag("common", 0.9), tag("rare", 0.6)],
            &idf,
        );

        assert_eq!(scored[0].id, "rare");
        assert!((scored[0].distinctiveness - 1.2).abs() < 1e-9);
        assert!(scored.windows(2).all(|w| w[0].distinctiveness >= w[1].distinctiveness));
    }

    #[test]
    fn tag_missing_from_idf_scores_zero() {
        let scored = score_tag_distinctiveness(&[tag("ghost", 0.9)], &HashMap::new());
        assert_eq!(scored[0].distinctiveness, 0.0);
    }

    #[test]
    fn low_confidence_signals_do_not_trigger_modes() {
        let modes = infer_modes(
            &[tag("deep_work", 0.49)],
            EnrichmentMode::Social,
            MODE_CONFIDENCE_THRESHOLD,
        );
        assert_eq!(modes, vec![VenueMode::Social]);
    }

    #[test]
    fn mixed_fallback_is_exactly_rest() {
        let modes = infer_modes(&[], EnrichmentMode::Mixed, MODE_CONFIDENCE_THRESHOLD);
        assert_eq!(modes, vec![VenueMode::Rest]);
    }

    #[test]
    fn qualifying_modes_keep_fixed_order() {
        // Input order deliberately scrambled: coffee signal first,
        // work signal last. Output must stay work -> social -> coffee.
        let modes = infer_modes(
            &[
                tag("roastery_onsite", 0.9),
                tag("date", 0.8),
                tag("power_outlets", 0.7),
            ],
            EnrichmentMode::Rest,
            MODE_CONFIDENCE_THRESHOLD,
        );
        assert_eq!(modes, vec![VenueMode::Work, VenueMode::Social, VenueMode::Coffee]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let modes = infer_modes(
            &[tag("quiet", 0.5)],
            EnrichmentMode::Work,
            MODE_CONFIDENCE_THRESHOLD,
        );
        assert_eq!(modes, vec![VenueMode::Rest]);
    }
}
