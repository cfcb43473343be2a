//! Place-search adapter backed by the Apify Google Places actor.
//!
//! Two entry points mirror the two pipeline uses: a cheap places-only
//! search for verification, and a full scrape by place id (reviews +
//! photos) for enrichment input.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cafedex_core::error::Result;
use cafedex_core::models::place::{OpeningHours, PlaceLocation, PlaceReview};
use cafedex_core::models::CandidatePlace;
use cafedex_core::ports::PlaceSearch;

use crate::retry::{provider_error, status_error, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://api.apify.com";
const ACTOR_ID: &str = "compass~crawler-google-places";

/// Apify-backed [`PlaceSearch`] implementation.
pub struct ApifyPlaces {
    base_url: String,
    token: String,
    language: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ApifyPlaces {
    pub fn new(token: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            language: "zh-TW".to_string(),
            client: reqwest::Client::new(),
            retry,
        }
    }

    /// Override the API base URL (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn run_actor(&self, input: &serde_json::Value) -> Result<Vec<ApifyPlaceItem>> {
        let url = format!(
            "{}/v2/acts/{}/run-sync-get-dataset-items?token={}",
            self.base_url, ACTOR_ID, self.token
        );

        self.retry
            .run(|| async {
                let response = self
                    .client
                    .post(&url)
                    .json(input)
                    .send()
                    .await
                    .map_err(|e| provider_error("Apify request", e))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(status_error("Apify actor", status.as_u16(), &body));
                }

                response
                    .json::<Vec<ApifyPlaceItem>>()
                    .await
                    .map_err(|e| provider_error("Apify response parse", e))
            })
            .await
    }
}

#[async_trait]
impl PlaceSearch for ApifyPlaces {
    async fn search(
        &self,
        search_terms: &[String],
        max_results_per_term: u32,
    ) -> Result<Vec<CandidatePlace>> {
        tracing::info!("Starting places-only search for {} terms", search_terms.len());

        let input = serde_json::json!({
            "searchStringsArray": search_terms,
            "maxCrawledPlacesPerSearch": max_results_per_term,
            "language": self.language,
            "maxReviews": 0,
            "maxImages": 0,
            "oneEntryPerQuery": false,
        });

        let items = self.run_actor(&input).await?;
        tracing::info!("Got {} place results", items.len());
        Ok(items.into_iter().map(ApifyPlaceItem::into_candidate).collect())
    }

    async fn scrape_by_ids(
        &self,
        place_ids: &[String],
        max_reviews: u32,
        max_images: u32,
    ) -> Result<Vec<CandidatePlace>> {
        tracing::info!("Starting full scrape for {} places", place_ids.len());

        let start_urls: Vec<serde_json::Value> = place_ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "url": format!("https://www.google.com/maps/place/?q=place_id:{id}")
                })
            })
            .collect();

        let input = serde_json::json!({
            "startUrls": start_urls,
            "language": self.language,
            "maxReviews": max_reviews,
            "maxImages": max_images,
            "scrapeReviewerName": false,
            "scrapeReviewerId": false,
        });

        let items = self.run_actor(&input).await?;
        tracing::info!("Got {} full results", items.len());
        Ok(items.into_iter().map(ApifyPlaceItem::into_candidate).collect())
    }
}

// ─── Wire types ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApifyPlaceItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    place_id: String,
    #[serde(default)]
    address: String,
    location: ApifyLocation,
    total_score: Option<f64>,
    #[serde(default)]
    reviews_count: u32,
    #[serde(default)]
    opening_hours: Option<Vec<ApifyOpeningHours>>,
    phone: Option<String>,
    website: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    permanently_closed: bool,
    #[serde(default)]
    temporarily_closed: bool,
    #[serde(default)]
    reviews: Vec<ApifyReview>,
    #[serde(default)]
    image_urls: Vec<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    menu: Option<ApifyMenu>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApifyLocation {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct ApifyOpeningHours {
    #[serde(default)]
    day: String,
    #[serde(default)]
    hours: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApifyReview {
    text: Option<String>,
    #[serde(default)]
    stars: f64,
    #[serde(default)]
    publish_at: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApifyMenu {
    url: Option<String>,
}

impl ApifyPlaceItem {
    fn into_candidate(self) -> CandidatePlace {
        CandidatePlace {
            title: self.title,
            place_id: self.place_id,
            address: self.address,
            location: PlaceLocation { lat: self.location.lat, lng: self.location.lng },
            rating: self.total_score,
            review_count: self.reviews_count,
            opening_hours: self.opening_hours.map(|hours| {
                hours
                    .into_iter()
                    .map(|h| OpeningHours { day: h.day, hours: h.hours })
                    .collect()
            }),
            phone: self.phone,
            website: self.website,
            categories: self.categories,
            permanently_closed: self.permanently_closed,
            temporarily_closed: self.temporarily_closed,
            reviews: self
                .reviews
                .into_iter()
                .map(|r| PlaceReview {
                    text: r.text,
                    stars: r.stars,
                    published_at: r.publish_at,
                    language: r.language,
                })
                .collect(),
            image_urls: self.image_urls,
            price: self.price,
            description: self.description,
            menu_url: self.menu.and_then(|m| m.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_search_item_without_scrape_fields() {
        let raw = serde_json::json!({
            "title": "好咖啡",
            "placeId": "ChIJ_test123",
            "address": "100號 南京東路",
            "location": { "lat": 25.05, "lng": 121.52 },
            "totalScore": 4.2,
            "reviewsCount": 150,
            "categories": ["Coffee shop"],
            "permanentlyClosed": false,
            "temporarilyClosed": false
        });

        let item: ApifyPlaceItem = serde_json::from_value(raw).unwrap();
        let candidate = item.into_candidate();
        assert_eq!(candidate.place_id, "ChIJ_test123");
        assert_eq!(candidate.rating, Some(4.2));
        assert!(candidate.reviews.is_empty());
        assert!(candidate.image_urls.is_empty());
    }

    #[test]
    fn deserializes_full_scrape_item() {
        let raw = serde_json::json!({
            "title": "好咖啡",
            "placeId": "ChIJ_test123",
            "address": "100號 南京東路",
            "location": { "lat": 25.05, "lng": 121.52 },
            "totalScore": 4.2,
            "reviewsCount": 150,
            "permanentlyClosed": false,
            "temporarilyClosed": false,
            "reviews": [
                { "text": "很安靜", "stars": 5, "publishAt": "2024-11-01", "language": "zh-TW" },
                { "text": null, "stars": 4, "publishAt": "2024-10-01" }
            ],
            "imageUrls": ["https://example.com/menu.jpg"],
            "price": "$$",
            "menu": { "url": "https://example.com/menu" }
        });

        let candidate: CandidatePlace =
            serde_json::from_value::<ApifyPlaceItem>(raw).unwrap().into_candidate();
        assert_eq!(candidate.reviews.len(), 2);
        assert_eq!(candidate.reviews[1].text, None);
        assert_eq!(candidate.menu_url.as_deref(), Some("https://example.com/menu"));
    }
}
