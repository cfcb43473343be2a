//! Verify stage: resolve cleaned venues against the place-search
//! provider.
//!
//! One cheap search call for the whole batch (one result per term),
//! then the chain-aware resolver picks at most one open candidate per
//! venue. Venues without an acceptable candidate go to the unmatched
//! checkpoint with a reason, never silently dropped.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cafedex_core::matching::{find_best_match, unmatched_reason, MatchTier};
use cafedex_core::models::{CandidatePlace, CleanedVenue, UnmatchedVenue, VerifiedVenue};
use cafedex_core::ports::PlaceSearch;
use cafedex_core::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyStats {
    pub total_input: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
}

#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub verified: Vec<VerifiedVenue>,
    pub unmatched: Vec<UnmatchedVenue>,
    pub stats: VerifyStats,
}

/// Search term for one venue: name plus address narrows the provider
/// to the right block of the right street.
fn build_search_term(venue: &CleanedVenue) -> String {
    format!("{} {}", venue.name, venue.address)
}

fn merge_match(
    venue: &CleanedVenue,
    candidate: &CandidatePlace,
    confidence: f64,
) -> VerifiedVenue {
    let opening_hours = candidate.opening_hours.as_ref().map(|hours| {
        hours.iter().map(|h| format!("{}: {}", h.day, h.hours)).collect::<Vec<_>>()
    });

    VerifiedVenue {
        seed_id: venue.seed_id.clone(),
        place_id: candidate.place_id.clone(),
        match_confidence: confidence,
        name: venue.name.clone(),
        address: venue.address.clone(),
        latitude: venue.latitude,
        longitude: venue.longitude,
        mrt: venue.mrt.clone(),
        limited_time: venue.limited_time.clone(),
        socket: venue.socket.clone(),
        social_url: venue.social_url.clone(),
        provider_name: candidate.title.clone(),
        provider_address: candidate.address.clone(),
        provider_latitude: candidate.location.lat,
        provider_longitude: candidate.location.lng,
        rating: candidate.rating,
        review_count: candidate.review_count,
        opening_hours,
        phone: candidate.phone.clone(),
        website: candidate.website.clone(),
        categories: candidate.categories.clone(),
    }
}

/// Runs verification for the whole batch against one provider search.
pub async fn run_verify(
    venues: &[CleanedVenue],
    places: &dyn PlaceSearch,
) -> Result<VerifyOutcome> {
    let terms: Vec<String> = venues.iter().map(build_search_term).collect();
    let candidates = places.search(&terms, 1).await?;
    info!(venues = venues.len(), candidates = candidates.len(), "place search complete");

    let mut verified = Vec::new();
    let mut unmatched = Vec::new();
    let mut stats = VerifyStats { total_input: venues.len(), ..VerifyStats::default() };

    for venue in venues {
        let accepted = find_best_match(venue, &candidates).and_then(|m| {
            candidates.iter().find(|c| c.place_id == m.place_id).map(|c| (m, c))
        });
        match accepted {
            Some((m, candidate)) => {
                debug!(
                    seed_id = %venue.seed_id,
                    place_id = %m.place_id,
                    confidence = m.confidence,
                    "venue matched"
                );
                match m.tier {
                    MatchTier::High => stats.high_confidence += 1,
                    MatchTier::Medium | MatchTier::Low => stats.medium_confidence += 1,
                }
                verified.push(merge_match(venue, candidate, m.confidence));
                stats.matched += 1;
            }
            None => {
                let reason = unmatched_reason(venue, &candidates);
                debug!(seed_id = %venue.seed_id, ?reason, "venue unmatched");
                unmatched.push(UnmatchedVenue {
                    seed_id: venue.seed_id.clone(),
                    name: venue.name.clone(),
                    address: venue.address.clone(),
                    latitude: venue.latitude,
                    longitude: venue.longitude,
                    reason,
                });
                stats.unmatched += 1;
            }
        }
    }

    info!(
        matched = stats.matched,
        unmatched = stats.unmatched,
        high = stats.high_confidence,
        "verification complete"
    );

    Ok(VerifyOutcome { verified, unmatched, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cafedex_core::models::place::{OpeningHours, PlaceLocation};
    use cafedex_core::models::UnmatchedReason;

    struct FixedPlaces {
        results: Vec<CandidatePlace>,
    }

    #[async_trait]
    impl PlaceSearch for FixedPlaces {
        async fn search(
            &self,
            _search_terms: &[String],
            _max_results_per_term: u32,
        ) -> Result<Vec<CandidatePlace>> {
            Ok(self.results.clone())
        }

        async fn scrape_by_ids(
            &self,
            _place_ids: &[String],
            _max_reviews: u32,
            _max_images: u32,
        ) -> Result<Vec<CandidatePlace>> {
            Ok(Vec::new())
        }
    }

    fn venue(id: &str, name: &str, lat: f64, lng: f64) -> CleanedVenue {
        CleanedVenue {
            seed_id: id.to_string(),
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
            address: "100號 南京東路, 中山區".to_string(),
            location: PlaceLocation { lat, lng },
            rating: Some(4.3),
            review_count: 210,
            opening_hours: Some(vec![OpeningHours {
                day: "Monday".to_string(),
                hours: "8 AM to 9 PM".to_string(),
            }]),
            phone: Some("+886 2 1234 5678".to_string()),
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

    #[tokio::test]
    async fn matched_venue_merges_provider_fields() {
        let places =
            FixedPlaces { results: vec![candidate("好咖啡", "p-1", 25.0501, 121.5201)] };
        let venues = vec![venue("cn-1", "好咖啡", 25.05, 121.52)];

        let outcome = run_verify(&venues, &places).await.unwrap();

        assert_eq!(outcome.verified.len(), 1);
        let v = &outcome.verified[0];
        assert_eq!(v.place_id, "p-1");
        assert_eq!(v.provider_name, "好咖啡");
        assert_eq!(
            v.opening_hours,
            Some(vec!["Monday: 8 AM to 9 PM".to_string()])
        );
        assert!(v.match_confidence > 0.5);
        assert_eq!(outcome.stats.matched, 1);
        assert_eq!(outcome.stats.high_confidence, 1);
    }

    #[tokio::test]
    async fn unmatched_venue_keeps_reason() {
        let mut closed = candidate("好咖啡", "p-1", 25.0501, 121.5201);
        closed.permanently_closed = true;
        let places = FixedPlaces { results: vec![closed] };
        let venues = vec![venue("cn-1", "好咖啡", 25.05, 121.52)];

        let outcome = run_verify(&venues, &places).await.unwrap();

        assert!(outcome.verified.is_empty());
        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.unmatched[0].reason, UnmatchedReason::PermanentlyClosed);
        assert_eq!(outcome.stats.unmatched, 1);
    }

    #[tokio::test]
    async fn no_candidates_routes_everything_to_unmatched() {
        let places = FixedPlaces { results: Vec::new() };
        let venues = vec![venue("cn-1", "好咖啡", 25.05, 121.52)];

        let outcome = run_verify(&venues, &places).await.unwrap();

        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.unmatched[0].reason, UnmatchedReason::NoMatch);
    }

    #[test]
    fn search_term_is_name_then_address() {
        let v = venue("cn-1", "好咖啡", 25.05, 121.52);
        assert_eq!(build_search_term(&v), "好咖啡 台北市中山區南京東路100號");
    }
}
