//! Taxonomy seeding: one structured-generation call proposing the
//! controlled vocabulary, written out for human curation.

use serde::{Deserialize, Serialize};
use tracing::info;

use cafedex_core::models::{EnrichableVenue, TagDimension, TaxonomyTag};
use cafedex_core::ports::{StructuredGenerator, ToolSchema};
use cafedex_core::Result;

/// Reviews sampled per venue for the proposal prompt, longest first.
pub const DEFAULT_REVIEWS_PER_VENUE: usize = 2;

const SYSTEM_PROMPT: &str = "You are designing a tagging taxonomy for a coffee-venue catalog \
in Taipei. Tags must be concrete, observable properties a visitor could confirm, split into \
four dimensions: functionality (what you can do there), time (when to go), ambience (what it \
feels like), and mode (what it is best for). Prefer 10-20 tags per dimension. Every tag needs \
a snake_case English id, a short English label, and a Traditional Chinese label.";

#[derive(Debug, Clone)]
pub struct TaxonomyOutcome {
    pub tags: Vec<TaxonomyTag>,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Longest non-empty reviews per venue; longer reviews carry more of
/// the vocabulary the taxonomy needs to cover.
pub fn sample_reviews(venue: &EnrichableVenue, per_venue: usize) -> Vec<&str> {
    let mut texts: Vec<&str> = venue
        .reviews
        .iter()
        .map(|r| r.text.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    texts.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    texts.truncate(per_venue);
    texts
}

fn build_user_message(venues: &[EnrichableVenue], per_venue: usize) -> String {
    let mut sections = Vec::with_capacity(venues.len());
    for venue in venues {
        let mut lines = vec![format!("## {}", venue.name)];
        if !venue.categories.is_empty() {
            lines.push(format!("Categories: {}", venue.categories.join(", ")));
        }
        for text in sample_reviews(venue, per_venue) {
            lines.push(format!("- {text}"));
        }
        sections.push(lines.join("\n"));
    }
    format!(
        "Propose the taxonomy from these {} venues and their reviews:\n\n{}",
        venues.len(),
        sections.join("\n\n")
    )
}

fn proposal_schema() -> ToolSchema {
    let tag_items = serde_json::json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "snake_case English identifier" },
                "label": { "type": "string", "description": "Short English label" },
                "label_zh": { "type": "string", "description": "Traditional Chinese label" }
            },
            "required": ["id", "label", "label_zh"]
        }
    });

    ToolSchema {
        name: "propose_taxonomy".to_string(),
        description: "Propose the complete four-dimension tag taxonomy.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "functionality": tag_items.clone(),
                "time": tag_items.clone(),
                "ambience": tag_items.clone(),
                "mode": tag_items
            },
            "required": ["functionality", "time", "ambience", "mode"]
        }),
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct ProposedTag {
    id: String,
    label: String,
    label_zh: String,
}

/// Four-array payload the generator answers with.
#[derive(Debug, Deserialize, Serialize)]
struct TaxonomyProposal {
    functionality: Vec<ProposedTag>,
    time: Vec<ProposedTag>,
    ambience: Vec<ProposedTag>,
    mode: Vec<ProposedTag>,
}

impl TaxonomyProposal {
    /// Flattens into the canonical dimension order.
    fn flatten(self) -> Vec<TaxonomyTag> {
        let mut tags = Vec::new();
        for dimension in TagDimension::ALL {
            let proposed = match dimension {
                TagDimension::Functionality => &self.functionality,
                TagDimension::Time => &self.time,
                TagDimension::Ambience => &self.ambience,
                TagDimension::Mode => &self.mode,
            };
            for tag in proposed {
                tags.push(TaxonomyTag {
                    id: tag.id.clone(),
                    dimension,
                    label: tag.label.clone(),
                    label_zh: tag.label_zh.clone(),
                });
            }
        }
        tags
    }
}

/// Runs the taxonomy proposal call over the whole venue corpus.
pub async fn run_taxonomy_seed(
    venues: &[EnrichableVenue],
    generator: &dyn StructuredGenerator,
    reviews_per_venue: usize,
) -> Result<TaxonomyOutcome> {
    let user_message = build_user_message(venues, reviews_per_venue);
    let schema = proposal_schema();

    let response = generator.generate(SYSTEM_PROMPT, &user_message, &schema).await?;
    let proposal: TaxonomyProposal = serde_json::from_value(response.output)?;
    let tags = proposal.flatten();

    info!(
        tags = tags.len(),
        model = generator.model_id(),
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "taxonomy proposal complete"
    );

    Ok(TaxonomyOutcome {
        tags,
        input_tokens: response.input_tokens,
        output_tokens: response.output_tokens,
    })
}
