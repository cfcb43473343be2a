//! Scrape stage: full-detail fetch by place id, merged into
//! enrichment-ready venues.
//!
//! Identity is strictly by place id, no fuzzy matching happens here.
//! Venues whose id is absent from the scrape results are logged and
//! counted, never fatal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cafedex_core::models::{
    CandidatePlace, EnrichableVenue, PhotoCategory, PhotoData, ReviewData, VerifiedVenue,
};
use cafedex_core::ports::PlaceSearch;
use cafedex_core::Result;

/// Most reviews kept per venue, longest scrape first.
pub const MAX_REVIEWS: u32 = 20;

/// Most photos kept per venue after categorization.
pub const MAX_PHOTOS: usize = 5;

/// URL fragments marking a menu photo. Checked before food patterns.
const MENU_PATTERNS: [&str; 3] = ["menu", "菜單", "價目"];

/// URL fragments marking a food/drink photo.
const FOOD_PATTERNS: [&str; 6] = ["food", "drink", "coffee", "latte", "咖啡", "餐"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeStats {
    pub total_input: usize,
    pub scraped: usize,
    pub missing: usize,
    pub with_reviews: usize,
    pub with_photos: usize,
    pub with_menu: usize,
}

#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub venues: Vec<EnrichableVenue>,
    pub stats: ScrapeStats,
}

fn categorize_url(url: &str) -> PhotoCategory {
    let lower = url.to_lowercase();
    if MENU_PATTERNS.iter().any(|p| lower.contains(p)) {
        PhotoCategory::Menu
    } else if FOOD_PATTERNS.iter().any(|p| lower.contains(p)) {
        PhotoCategory::Food
    } else {
        PhotoCategory::General
    }
}

/// Categorizes photo URLs and keeps at most [`MAX_PHOTOS`], menu
/// photos first so they always survive the cap.
pub fn categorize_photos(image_urls: &[String]) -> Vec<PhotoData> {
    let mut photos: Vec<PhotoData> = image_urls
        .iter()
        .map(|url| {
            let category = categorize_url(url);
            PhotoData {
                url: url.clone(),
                category,
                is_menu: category == PhotoCategory::Menu,
            }
        })
        .collect();

    photos.sort_by_key(|p| p.category);
    photos.truncate(MAX_PHOTOS);
    photos
}

/// Keeps reviews with non-empty text, capped, language defaulted to
/// "unknown".
fn clean_reviews(scraped: &CandidatePlace) -> Vec<ReviewData> {
    scraped
        .reviews
        .iter()
        .filter_map(|r| {
            let text = r.text.as_deref().unwrap_or("").trim();
            if text.is_empty() {
                return None;
            }
            Some(ReviewData {
                text: text.to_string(),
                stars: r.stars,
                published_at: r.published_at.clone(),
                language: r.language.clone().unwrap_or_else(|| "unknown".to_string()),
            })
        })
        .take(MAX_REVIEWS as usize)
        .collect()
}

fn merge_full_data(venue: &VerifiedVenue, scraped: &CandidatePlace) -> EnrichableVenue {
    EnrichableVenue {
        seed_id: venue.seed_id.clone(),
        place_id: venue.place_id.clone(),
        match_confidence: venue.match_confidence,
        name: venue.name.clone(),
        address: venue.address.clone(),
        latitude: venue.latitude,
        longitude: venue.longitude,
        mrt: venue.mrt.clone(),
        rating: scraped.rating.or(venue.rating),
        review_count: scraped.review_count.max(venue.review_count),
        opening_hours: venue.opening_hours.clone(),
        phone: scraped.phone.clone().or_else(|| venue.phone.clone()),
        website: scraped.website.clone().or_else(|| venue.website.clone()),
        categories: if scraped.categories.is_empty() {
            venue.categories.clone()
        } else {
            scraped.categories.clone()
        },
        price_range: scraped.price.clone(),
        description: scraped.description.clone(),
        menu_url: scraped.menu_url.clone(),
        limited_time: venue.limited_time.clone(),
        socket: venue.socket.clone(),
        social_url: venue.social_url.clone(),
        reviews: clean_reviews(scraped),
        photos: categorize_photos(&scraped.image_urls),
    }
}

/// Runs the full-detail scrape for every verified venue and merges the
/// results.
pub async fn run_scrape(
    venues: &[VerifiedVenue],
    places: &dyn PlaceSearch,
) -> Result<ScrapeOutcome> {
    let place_ids: Vec<String> = venues.iter().map(|v| v.place_id.clone()).collect();
    let scraped = places.scrape_by_ids(&place_ids, MAX_REVIEWS, MAX_PHOTOS as u32).await?;
    let by_place_id: HashMap<&str, &CandidatePlace> =
        scraped.iter().map(|p| (p.place_id.as_str(), p)).collect();

    let mut stats = ScrapeStats { total_input: venues.len(), ..ScrapeStats::default() };
    let mut enrichable = Vec::new();

    for venue in venues {
        let Some(details) = by_place_id.get(venue.place_id.as_str()) else {
            warn!(seed_id = %venue.seed_id, place_id = %venue.place_id, "no scrape result");
            stats.missing += 1;
            continue;
        };

        let merged = merge_full_data(venue, details);
        stats.scraped += 1;
        if !merged.reviews.is_empty() {
            stats.with_reviews += 1;
        }
        if !merged.photos.is_empty() {
            stats.with_photos += 1;
        }
        if merged.menu_url.is_some() {
            stats.with_menu += 1;
        }
        enrichable.push(merged);
    }

    info!(
        input = stats.total_input,
        scraped = stats.scraped,
        missing = stats.missing,
        with_reviews = stats.with_reviews,
        with_photos = stats.with_photos,
        with_menu = stats.with_menu,
        "scrape merge complete"
    );

    Ok(ScrapeOutcome { venues: enrichable, stats })
}
