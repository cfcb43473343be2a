use serde::{Deserialize, Serialize};

use super::place::{PhotoData, ReviewData};

/// Seed venue merged with its verified place-search match.
///
/// Invariants enforced by the resolver: at most one candidate per
/// cleaned venue, distance <= 200 m, name score >= 0.5, candidate open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedVenue {
    pub seed_id: String,
    pub place_id: String,
    pub match_confidence: f64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub mrt: String,
    pub limited_time: String,
    pub socket: String,
    pub social_url: String,
    // From the place-search provider.
    pub provider_name: String,
    pub provider_address: String,
    pub provider_latitude: f64,
    pub provider_longitude: f64,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub opening_hours: Option<Vec<String>>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub categories: Vec<String>,
}

/// Why a cleaned venue failed verification. Kept for manual review,
/// never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    NoMatch,
    PermanentlyClosed,
    TemporarilyClosed,
    /// Reserved for a manual-review policy layered on medium-tier
    /// matches; the resolver itself never emits it.
    LowConfidence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnmatchedVenue {
    pub seed_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub reason: UnmatchedReason,
}

/// Verified venue with bounded review/photo sets, ready for the
/// enrichment classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichableVenue {
    pub seed_id: String,
    pub place_id: String,
    pub match_confidence: f64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub mrt: String,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub opening_hours: Option<Vec<String>>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub categories: Vec<String>,
    pub price_range: Option<String>,
    pub description: Option<String>,
    pub menu_url: Option<String>,
    pub limited_time: String,
    pub socket: String,
    pub social_url: String,
    pub reviews: Vec<ReviewData>,
    pub photos: Vec<PhotoData>,
}
