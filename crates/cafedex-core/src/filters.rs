//! Seed filter rules.
//!
//! Pure predicates over raw seed records; the seed stage applies them
//! in order (closed -> shell -> bounds -> dedup) and counts each drop.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::geo::haversine_distance_m;
use crate::models::SeedRecord;

/// Name markers left behind by the community when a venue shuts down.
const CLOSED_KEYWORDS: [&str; 4] = ["已歇業", "暫停營業", "已關", "已結束"];

/// Maximum distance in meters for two same-named venues to be
/// considered duplicates.
pub const DUPLICATE_RADIUS_M: f64 = 50.0;

/// Inclusive geographic bounding box for accepted venues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl BoundingBox {
    /// Greater Taipei.
    pub const TAIPEI: BoundingBox = BoundingBox {
        lat_min: 24.95,
        lat_max: 25.22,
        lng_min: 121.40,
        lng_max: 121.65,
    };

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lng >= self.lng_min && lng <= self.lng_max
    }
}

/// Returns true if the venue name carries a known-closed marker.
pub fn is_known_closed(name: &str) -> bool {
    CLOSED_KEYWORDS.iter().any(|kw| name.contains(kw))
}

/// Returns true if the record is missing critical fields or carries
/// unusable coordinates.
pub fn is_shell_entry(record: &SeedRecord) -> bool {
    if record.name.is_empty()
        || record.address.is_empty()
        || record.latitude.is_empty()
        || record.longitude.is_empty()
    {
        return true;
    }
    match (parse_coordinate(&record.latitude), parse_coordinate(&record.longitude)) {
        (Some(lat), Some(lng)) => lat == 0.0 || lng == 0.0,
        _ => true,
    }
}

/// Parses a raw coordinate string; `None` for non-numeric values.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Finds duplicate venues: identical name within [`DUPLICATE_RADIUS_M`]
/// of an earlier record. Returns the seed ids to drop; the first
/// occurrence is always kept.
pub fn find_duplicates(venues: &[crate::models::CleanedVenue]) -> HashSet<String> {
    let mut dropped: HashSet<String> = HashSet::new();

    for i in 0..venues.len() {
        if dropped.contains(&venues[i].seed_id) {
            continue;
        }
        for j in (i + 1)..venues.len() {
            if dropped.contains(&venues[j].seed_id) {
                continue;
            }
            if venues[i].name == venues[j].name
                && haversine_distance_m(
                    venues[i].latitude,
                    venues[i].longitude,
                    venues[j].latitude,
                    venues[j].longitude,
                ) <= DUPLICATE_RADIUS_M
            {
                dropped.insert(venues[j].seed_id.clone());
            }
        }
    }

    dropped
}
