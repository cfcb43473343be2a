use serde::{Deserialize, Serialize};

/// Coordinates as returned by the place-search provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaceLocation {
    pub lat: f64,
    pub lng: f64,
}

/// One opening-hours line from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHours {
    pub day: String,
    pub hours: String,
}

/// A review attached to a full-scrape result. Text may be absent
/// (rating-only reviews), in which case the merger drops it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceReview {
    pub text: Option<String>,
    pub stars: f64,
    pub published_at: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// A place-search provider result.
///
/// The reviews/photos/price/description/menu fields are only populated
/// by the full-scrape call; the cheap search call leaves them empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatePlace {
    pub title: String,
    pub place_id: String,
    pub address: String,
    pub location: PlaceLocation,
    pub rating: Option<f64>,
    pub review_count: u32,
    #[serde(default)]
    pub opening_hours: Option<Vec<OpeningHours>>,
    pub phone: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub permanently_closed: bool,
    pub temporarily_closed: bool,
    // Full-scrape only.
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub menu_url: Option<String>,
}

/// Review kept on an enrichable venue: non-empty text, metadata
/// preserved, unknown language defaulted to a sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewData {
    pub text: String,
    pub stars: f64,
    pub published_at: String,
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoCategory {
    Menu,
    Food,
    General,
}

/// Categorized photo URL. Menu photos sort first so downstream
/// consumers always see menus inside the capped set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoData {
    pub url: String,
    pub category: PhotoCategory,
    pub is_menu: bool,
}
