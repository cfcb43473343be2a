//! Chain-aware entity resolution between cleaned seed venues and
//! place-search candidates.

use serde::{Deserialize, Serialize};

use crate::chains::{decompose_brand_branch, detect_chain};
use crate::geo::haversine_distance_m;
use crate::models::{CandidatePlace, CleanedVenue, UnmatchedReason};
use crate::text::name_similarity;

/// Maximum distance in meters for a match to be considered valid.
pub const MAX_MATCH_DISTANCE_M: f64 = 200.0;

/// Minimum name similarity for a match.
pub const MIN_NAME_SCORE: f64 = 0.5;

/// Confidence band of an accepted match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    High,
    Medium,
    /// Unreachable while the rejection threshold sits at 0.5 (a
    /// surviving candidate always scores at least 0.5); kept as the
    /// hook for a future relaxed-threshold mode.
    Low,
}

impl MatchTier {
    pub fn from_confidence(confidence: f64) -> MatchTier {
        if confidence >= 0.75 {
            MatchTier::High
        } else if confidence >= 0.5 {
            MatchTier::Medium
        } else {
            MatchTier::Low
        }
    }
}

/// An accepted candidate for one seed venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub place_id: String,
    pub confidence: f64,
    pub distance_m: f64,
    pub name_score: f64,
    pub tier: MatchTier,
}

/// Name score for one venue/candidate pair, honoring the chain gate.
///
/// When the seed venue is a recognized chain, the candidate must
/// resolve to the same brand (else `None`: cross-branch collisions for
/// multi-location brands are worse than a missed match). Brand-matched
/// pairs are scored on their branch portions so `中山店` cannot match
/// `信義店`; if either side has no branch text the comparison falls
/// back to the full names.
fn chain_aware_name_score(venue_name: &str, candidate_title: &str) -> Option<f64> {
    let seed_chain = match detect_chain(venue_name) {
        Some(chain) => chain,
        None => return Some(name_similarity(venue_name, candidate_title)),
    };

    let candidate_chain = detect_chain(candidate_title)?;
    if candidate_chain.brand != seed_chain.brand {
        return None;
    }

    let seed_parts = decompose_brand_branch(venue_name);
    let candidate_parts = decompose_brand_branch(candidate_title);

    match (seed_parts, candidate_parts) {
        (Some(s), Some(c)) if !s.branch.is_empty() && !c.branch.is_empty() => {
            Some(name_similarity(&s.branch, &c.branch))
        }
        _ => Some(name_similarity(venue_name, candidate_title)),
    }
}

/// Finds the best place-search candidate for a cleaned venue, or `None`
/// if nothing survives the distance, chain, and name thresholds.
pub fn find_best_match(venue: &CleanedVenue, candidates: &[CandidatePlace]) -> Option<MatchResult> {
    let mut best: Option<MatchResult> = None;

    for candidate in candidates {
        if candidate.permanently_closed || candidate.temporarily_closed {
            continue;
        }

        let distance_m = haversine_distance_m(
            venue.latitude,
            venue.longitude,
            candidate.location.lat,
            candidate.location.lng,
        );
        if distance_m > MAX_MATCH_DISTANCE_M {
            continue;
        }

        let name_score = match chain_aware_name_score(&venue.name, &candidate.title) {
            Some(score) => score,
            None => continue,
        };
        if name_score < MIN_NAME_SCORE {
            continue;
        }

        let distance_score = 1.0 - distance_m / MAX_MATCH_DISTANCE_M;
        let confidence = name_score * 0.6 + distance_score * 0.4;

        if best.as_ref().map_or(true, |b| confidence > b.confidence) {
            best = Some(MatchResult {
                place_id: candidate.place_id.clone(),
                confidence,
                distance_m,
                name_score,
                tier: MatchTier::from_confidence(confidence),
            });
        }
    }

    best
}

/// Reason code for a venue that found no acceptable match.
///
/// Prefers the closure flag of the closest-by-name candidate (substring
/// containment either way), else `NoMatch`. `LowConfidence` is never
/// produced here.
pub fn unmatched_reason(venue: &CleanedVenue, candidates: &[CandidatePlace]) -> UnmatchedReason {
    let by_name = candidates
        .iter()
        .find(|c| c.title.contains(&venue.name) || venue.name.contains(&c.title));

    match by_name {
        Some(c) if c.permanently_closed => UnmatchedReason::PermanentlyClosed,
        Some(c) if c.temporarily_closed => UnmatchedReason::TemporarilyClosed,
        _ => UnmatchedReason::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::PlaceLocation;

    fn venue(name: &str, lat: f64, lng: f64) -> CleanedVenue {
        CleanedVenue {
            seed_id: "cn-1".to_string(),
            name: name.to_string(),
            address: "台北市中山區南京東路100號".to_string(),
            latitude: lat,
            longitude: lng,
            social_url: String::new(),
            mrt: "中山".to_string(),
            limited_time: "no".to_string(),
            socket: "yes".to_string(),
        }
    }

    fn candidate(title: &str, place_id: &str, lat: f64, lng: f64) -> CandidatePlace {
        CandidatePlace {
            title: title.to_string(),
            place_id: place_id.to_string(),
            address: "100號 南京東路, 中山區, 台北市".to_string(),
            location: PlaceLocation { lat, lng },
            rating: Some(4.2),
            review_count: 150,
            opening_hours: None,
            phone: None,
            website: None,
            categories: vec!["Coffee shop".to_string()],
            permanently_closed: false,
            temporarily_closed: false,
            reviews: Vec::new(),
            image_urls: Vec::new(),
            price: None,
            description: None,
            menu_url: None,
        }
    }

    #[test]
    fn matches_nearby_candidate_with_similar_name() {
        let v = venue("好咖啡", 25.05, 121.52);
        let cands = vec![
            candidate("好咖啡", "p-good", 25.0501, 121.5201),
            candidate("壞咖啡", "p-bad", 25.06, 121.53),
        ];

        let m = find_best_match(&v, &cands).expect("should match");
        assert_eq!(m.place_id, "p-good");
        assert!(m.confidence > 0.5);
        assert_eq!(m.tier, MatchTier::High);
    }

    #[test]
    fn rejects_beyond_200m() {
        let v = venue("好咖啡", 25.05, 121.52);
        let cands = vec![candidate("好咖啡", "p-far", 25.1, 121.6)];
        assert!(find_best_match(&v, &cands).is_none());
    }

    #[test]
    fn rejects_low_name_similarity() {
        let v = venue("完全不同的店名", 25.05, 121.52);
        let cands = vec![candidate("Starbucks Reserve", "p-sb", 25.0501, 121.5201)];
        assert!(find_best_match(&v, &cands).is_none());
    }

    #[test]
    fn rejects_closed_candidates() {
        let v = venue("好咖啡", 25.05, 121.52);

        let mut permanently = candidate("好咖啡", "p-1", 25.0501, 121.5201);
        permanently.permanently_closed = true;
        assert!(find_best_match(&v, &[permanently]).is_none());

        let mut temporarily = candidate("好咖啡", "p-2", 25.0501, 121.5201);
        temporarily.temporarily_closed = true;
        assert!(find_best_match(&v, &[temporarily]).is_none());
    }

    #[test]
    fn empty_candidate_list_is_none() {
        let v = venue("好咖啡", 25.05, 121.52);
        assert!(find_best_match(&v, &[]).is_none());
    }

    #[test]
    fn chain_rejects_different_branch_of_same_brand() {
        // ~25m apart and textually near-identical, but different
        // branches of the same chain must never be merged.
        let v = venue("路易莎咖啡 中山店", 25.05, 121.52);
        let cands = vec![candidate("路易莎咖啡 信義店", "p-xinyi", 25.0502, 121.5202)];
        assert!(find_best_match(&v, &cands).is_none());
    }

    #[test]
    fn chain_accepts_same_branch_spelled_differently() {
        let v = venue("路易莎咖啡 中山店", 25.05, 121.52);
        let cands = vec![candidate("路易莎咖啡 中山", "p-zhongshan", 25.0502, 121.5202)];

        let m = find_best_match(&v, &cands).expect("same branch should match");
        assert_eq!(m.place_id, "p-zhongshan");
        assert!(m.confidence > 0.5);
    }

    #[test]
    fn chain_without_branch_falls_back_to_full_name() {
        // Seed is exactly the canonical brand, so its branch is empty
        // and the comparison falls back to the full names.
        let v = venue("星巴克", 25.05, 121.52);
        let cands = vec![candidate("星巴克 信義店", "p-xinyi", 25.0502, 121.5202)];

        let m = find_best_match(&v, &cands).expect("brand-only seed should match");
        assert_eq!(m.place_id, "p-xinyi");
    }

    #[test]
    fn chain_alias_seed_matches_on_branch_residue() {
        // "cama cafe" decomposes via the earlier alias "cama", leaving
        // branch "cafe", so this pair is compared branch-vs-branch
        // ("cafe" against "cafe 大安店") and still clears the threshold.
        let v = venue("cama cafe", 25.05, 121.52);
        let cands = vec![candidate("cama cafe 大安店", "p-daan", 25.0502, 121.5202)];

        let m = find_best_match(&v, &cands).expect("alias seed should match");
        assert_eq!(m.place_id, "p-daan");
        assert!(m.name_score >= MIN_NAME_SCORE);
    }

    #[test]
    fn chain_seed_rejects_non_chain_candidate() {
        let v = venue("星巴克 信義店", 25.05, 121.52);
        let cands = vec![candidate("信義咖啡店", "p-other", 25.0502, 121.5202)];
        assert!(find_best_match(&v, &cands).is_none());
    }

    #[test]
    fn unmatched_reason_prefers_closure_flag_of_name_containment_candidate() {
        let v = venue("好咖啡", 25.05, 121.52);

        let mut closed = candidate("好咖啡 中山店", "p-1", 25.0501, 121.5201);
        closed.permanently_closed = true;
        assert_eq!(
            unmatched_reason(&v, &[closed]),
            UnmatchedReason::PermanentlyClosed
        );

        let unrelated = candidate("別家咖啡", "p-2", 25.0501, 121.5201);
        assert_eq!(unmatched_reason(&v, &[unrelated]), UnmatchedReason::NoMatch);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(MatchTier::from_confidence(0.9), MatchTier::High);
        assert_eq!(MatchTier::from_confidence(0.75), MatchTier::High);
        assert_eq!(MatchTier::from_confidence(0.6), MatchTier::Medium);
        assert_eq!(MatchTier::from_confidence(0.4), MatchTier::Low);
    }
}
