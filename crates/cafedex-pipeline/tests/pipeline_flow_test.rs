//! Integration tests for the stage flow: checkpoints written by one
//! stage are read back by the next, and interrupted enrich/embed runs
//! resume by id without redoing finished work.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use cafedex_core::filters::BoundingBox;
use cafedex_core::models::place::PlaceLocation;
use cafedex_core::models::{
    CandidatePlace, CleanedVenue, EmbeddingRecord, EnrichableVenue, EnrichedVenue, SeedRecord,
    TagDimension, TaxonomyTag,
};
use cafedex_core::ports::{Embedder, PlaceSearch, StructuredGenerator, StructuredResponse, ToolSchema};
use cafedex_core::Result;
use cafedex_pipeline::checkpoint::{self, files};
use cafedex_pipeline::embed::run_embed;
use cafedex_pipeline::enrich::{run_enrich, EnrichOptions};
use cafedex_pipeline::seed::run_seed;
use cafedex_pipeline::verify::run_verify;

fn seed_record(id: &str, name: &str, address: &str, lat: &str, lng: &str) -> SeedRecord {
    SeedRecord {
        id: id.to_string(),
        name: name.to_string(),
        city: "taipei".to_string(),
        address: address.to_string(),
        latitude: lat.to_string(),
        longitude: lng.to_string(),
        url: String::new(),
        mrt: "中山".to_string(),
        limited_time: "no".to_string(),
        socket: "yes".to_string(),
        wifi: 4.0,
        seat: 3.0,
        quiet: 4.5,
    }
}

fn candidate(title: &str, place_id: &str, lat: f64, lng: f64) -> CandidatePlace {
    CandidatePlace {
        title: title.to_string(),
        place_id: place_id.to_string(),
        address: "南京東路100號".to_string(),
        location: PlaceLocation { lat, lng },
        rating: Some(4.3),
        review_count: 120,
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
        place_ids: &[String],
        _max_reviews: u32,
        _max_images: u32,
    ) -> Result<Vec<CandidatePlace>> {
        Ok(self
            .results
            .iter()
            .filter(|c| place_ids.contains(&c.place_id))
            .cloned()
            .collect())
    }
}

struct CountingGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl StructuredGenerator for CountingGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_message: &str,
        _schema: &ToolSchema,
    ) -> Result<StructuredResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(StructuredResponse {
            output: serde_json::json!({
                "tags": [{ "id": "quiet", "confidence": 0.9 }],
                "summary": "Calm venue.",
                "top_reviews": [],
                "mode": "rest"
            }),
            input_tokens: 10,
            output_tokens: 5,
        })
    }

    fn model_id(&self) -> &str {
        "fake-generator"
    }
}

struct CountingEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
    }

    fn model_name(&self) -> &str {
        "fake-embedder"
    }
}

fn taxonomy() -> Vec<TaxonomyTag> {
    vec![TaxonomyTag {
        id: "quiet".to_string(),
        dimension: TagDimension::Ambience,
        label: "Quiet".to_string(),
        label_zh: "安靜".to_string(),
    }]
}

fn enrichable(venue: &CleanedVenue, place_id: &str) -> EnrichableVenue {
    EnrichableVenue {
        seed_id: venue.seed_id.clone(),
        place_id: place_id.to_string(),
        match_confidence: 0.9,
        name: venue.name.clone(),
        address: venue.address.clone(),
        latitude: venue.latitude,
        longitude: venue.longitude,
        mrt: venue.mrt.clone(),
        rating: Some(4.3),
        review_count: 120,
        opening_hours: None,
        phone: None,
        website: None,
        categories: vec!["Coffee shop".to_string()],
        price_range: None,
        description: None,
        menu_url: None,
        limited_time: venue.limited_time.clone(),
        socket: venue.socket.clone(),
        social_url: venue.social_url.clone(),
        reviews: Vec::new(),
        photos: Vec::new(),
    }
}

#[test]
fn seed_stage_checkpoint_round_trip() {
    let dir = TempDir::new().unwrap();
    let records = vec![
        seed_record("1", "好咖啡", "台北市中山區南京東路100號", "25.05", "121.52"),
        seed_record("2", "倒了咖啡（已歇業）", "台北市信義區", "25.04", "121.56"),
        seed_record("3", "空殼咖啡", "", "25.05", "121.52"),
    ];

    let outcome = run_seed(&records, &BoundingBox::TAIPEI);
    assert_eq!(outcome.stats.filtered_closed, 1);
    assert_eq!(outcome.stats.filtered_shell, 1);
    assert_eq!(outcome.stats.total_output, 1);

    let path = dir.path().join(files::SEED);
    checkpoint::write(&path, &outcome.venues).unwrap();
    let loaded: Vec<CleanedVenue> = checkpoint::read(&path).unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].seed_id, "1");
    assert_eq!(loaded[0].latitude, 25.05);
}

#[tokio::test]
async fn verify_consumes_seed_output() {
    let records = vec![seed_record("1", "好咖啡", "台北市中山區南京東路100號", "25.05", "121.52")];
    let cleaned = run_seed(&records, &BoundingBox::TAIPEI).venues;

    let places = FixedPlaces { results: vec![candidate("好咖啡", "p-1", 25.0501, 121.5201)] };
    let outcome = run_verify(&cleaned, &places).await.unwrap();

    assert_eq!(outcome.verified.len(), 1);
    assert_eq!(outcome.verified[0].place_id, "p-1");
    assert!(outcome.unmatched.is_empty());
}

#[tokio::test]
async fn enrich_resumes_from_its_own_checkpoint() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(files::ENRICHED);
    let cleaned = CleanedVenue {
        seed_id: String::new(),
        name: "好咖啡".to_string(),
        address: "台北市中山區".to_string(),
        latitude: 25.05,
        longitude: 121.52,
        social_url: String::new(),
        mrt: "中山".to_string(),
        limited_time: "no".to_string(),
        socket: "yes".to_string(),
    };
    let venues: Vec<EnrichableVenue> = ["cn-1", "cn-2", "cn-3"]
        .iter()
        .map(|id| {
            let mut v = cleaned.clone();
            v.seed_id = id.to_string();
            enrichable(&v, &format!("p-{id}"))
        })
        .collect();

    // First run: classify only the first venue, persisting each one.
    let generator = CountingGenerator { calls: AtomicUsize::new(0) };
    let first = run_enrich(
        &venues,
        &taxonomy(),
        &generator,
        Vec::new(),
        &EnrichOptions { start_from: 0, limit: Some(1) },
        &mut |snapshot| checkpoint::write(&path, &snapshot.to_vec()),
    )
    .await
    .unwrap();
    assert_eq!(first.stats.enriched, 1);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

    // Second run resumes from the checkpoint and only does the rest.
    let existing: Vec<EnrichedVenue> = checkpoint::read_or_default(&path).unwrap();
    assert_eq!(existing.len(), 1);

    let second = run_enrich(
        &venues,
        &taxonomy(),
        &generator,
        existing,
        &EnrichOptions::default(),
        &mut |snapshot| checkpoint::write(&path, &snapshot.to_vec()),
    )
    .await
    .unwrap();

    assert_eq!(second.stats.skipped_existing, 1);
    assert_eq!(second.stats.enriched, 2);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);

    let final_set: Vec<EnrichedVenue> = checkpoint::read(&path).unwrap();
    let ids: HashSet<String> = final_set.iter().map(|v| v.venue.seed_id.clone()).collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn embed_resumes_by_id_after_interruption() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(files::EMBEDDINGS);
    let cleaned = CleanedVenue {
        seed_id: "cn-1".to_string(),
        name: "好咖啡".to_string(),
        address: "台北市中山區".to_string(),
        latitude: 25.05,
        longitude: 121.52,
        social_url: String::new(),
        mrt: "中山".to_string(),
        limited_time: "no".to_string(),
        socket: "yes".to_string(),
    };

    let generator = CountingGenerator { calls: AtomicUsize::new(0) };
    let enriched_venues: Vec<EnrichedVenue> = {
        let venues: Vec<EnrichableVenue> = ["cn-1", "cn-2", "cn-3", "cn-4"]
            .iter()
            .map(|id| {
                let mut v = cleaned.clone();
                v.seed_id = id.to_string();
                enrichable(&v, &format!("p-{id}"))
            })
            .collect();
        run_enrich(
            &venues,
            &taxonomy(),
            &generator,
            Vec::new(),
            &EnrichOptions::default(),
            &mut |_| Ok(()),
        )
        .await
        .unwrap()
        .enriched
    };

    // First run embeds one batch of two, then "crashes" before the
    // second batch by only processing a prefix of the venues.
    let embedder = CountingEmbedder { calls: AtomicUsize::new(0) };
    run_embed(&enriched_venues[..2], &taxonomy(), &embedder, Vec::new(), 2, &mut |snapshot| {
        checkpoint::write(&path, &snapshot.to_vec())
    })
    .await
    .unwrap();

    // Second run over the full set skips the two already on disk.
    let existing: Vec<EmbeddingRecord> = checkpoint::read_or_default(&path).unwrap();
    let outcome = run_embed(&enriched_venues, &taxonomy(), &embedder, existing, 2, &mut |snapshot| {
        checkpoint::write(&path, &snapshot.to_vec())
    })
    .await
    .unwrap();

    assert_eq!(outcome.stats.skipped_existing, 2);
    assert_eq!(outcome.stats.embedded, 2);
    assert_eq!(outcome.records.len(), 4);
    // One batch in the first run, one in the second.
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
}
