//! Canonical embedding-text construction.

use std::collections::HashMap;

use crate::models::{EnrichedVenue, TaxonomyTag};

/// Composes the text embedded for one venue.
///
/// Fixed layout: name, blank line, summary, blank line, a "Tags:" line
/// of bilingual labels, blank line, a bulleted "Selected reviews:"
/// block. Tag ids missing from the taxonomy are skipped silently, and
/// the review block disappears entirely when there are no excerpts,
/// so no header is left dangling and no missing field is ever rendered
/// as literal text.
pub fn compose_embedding_text(venue: &EnrichedVenue, taxonomy: &[TaxonomyTag]) -> String {
    let tag_map: HashMap<&str, &TaxonomyTag> =
        taxonomy.iter().map(|t| (t.id.as_str(), t)).collect();

    let tag_labels = venue
        .enrichment
        .tags
        .iter()
        .filter_map(|t| tag_map.get(t.id.as_str()))
        .map(|t| format!("{} / {}", t.label, t.label_zh))
        .collect::<Vec<_>>()
        .join(", ");

    let review_block = venue
        .enrichment
        .top_reviews
        .iter()
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut sections = vec![
        venue.venue.name.clone(),
        String::new(),
        venue.enrichment.summary.clone(),
        String::new(),
        format!("Tags: {tag_labels}"),
    ];
    if !review_block.is_empty() {
        sections.push(String::new());
        sections.push(format!("Selected reviews:\n{review_block}"));
    }

    sections.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EnrichableVenue, EnrichmentMode, EnrichmentRecord, TagAssignment, TagDimension,
    };

    fn taxonomy() -> Vec<TaxonomyTag> {
        vec![
            TaxonomyTag {
                id: "quiet".to_string(),
                dimension: TagDimension::Ambience,
                label: "Quiet".to_string(),
                label_zh: "安靜".to_string(),
            },
            TaxonomyTag {
                id: "power_outlets".to_string(),
                dimension: TagDimension::Functionality,
                label: "Power outlets".to_string(),
                label_zh: "有插座".to_string(),
            },
        ]
    }

    fn enriched(tags: Vec<TagAssignment>, top_reviews: Vec<String>) -> EnrichedVenue {
        EnrichedVenue {
            venue: EnrichableVenue {
                seed_id: "cn-1".to_string(),
                place_id: "p-1".to_string(),
                match_confidence: 0.9,
                name: "好咖啡".to_string(),
                address: String::new(),
                latitude: 25.05,
                longitude: 121.52,
                mrt: String::new(),
                rating: Some(4.5),
                review_count: 10,
                opening_hours: None,
                phone: None,
                website: None,
                categories: Vec::new(),
                price_range: None,
                description: None,
                menu_url: None,
                limited_time: "no".to_string(),
                socket: "yes".to_string(),
                social_url: String::new(),
                reviews: Vec::new(),
                photos: Vec::new(),
            },
            enrichment: EnrichmentRecord {
                tags,
                summary: "A calm space for reading.".to_string(),
                top_reviews,
                mode: EnrichmentMode::Rest,
                enriched_at: "2025-01-01T00:00:00Z".to_string(),
                model_id: "test-model".to_string(),
            },
        }
    }

    #[test]
    fn composes_all_sections_in_order() {
        let venue = enriched(
            vec![TagAssignment { id: "quiet".to_string(), confidence: 0.9 }],
            vec!["Great for studying".to_string()],
        );
        let text = compose_embedding_text(&venue, &taxonomy());

        let expected = "好咖啡\n\nA calm space for reading.\n\nTags: Quiet / 安靜\n\nSelected reviews:\n- Great for studying";
        assert_eq!(text, expected);
    }

    #[test]
    fn skips_unknown_tag_ids_silently() {
        let venue = enriched(
            vec![
                TagAssignment { id: "ghost_tag".to_string(), confidence: 0.9 },
                TagAssignment { id: "power_outlets".to_string(), confidence: 0.8 },
            ],
            Vec::new(),
        );
        let text = compose_embedding_text(&venue, &taxonomy());

        assert!(text.contains("Tags: Power outlets / 有插座"));
        assert!(!text.contains("ghost_tag"));
    }

    #[test]
    fn omits_review_block_when_no_excerpts() {
        let venue = enriched(Vec::new(), Vec::new());
        let text = compose_embedding_text(&venue, &taxonomy());

        assert!(!text.contains("Selected reviews"));
        assert!(text.ends_with("Tags:"));
    }
}
