use serde::{Deserialize, Serialize};

/// Classification dimension of a taxonomy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagDimension {
    /// What can you do there (outlets, wifi, laptop-friendly, ...).
    Functionality,
    /// When should you go (late night, no time limit, ...).
    Time,
    /// What does it feel like (quiet, photogenic, vintage, ...).
    Ambience,
    /// What is it best for (deep work, date, reading, ...).
    Mode,
}

impl TagDimension {
    /// All dimensions in the canonical flattening order.
    pub const ALL: [TagDimension; 4] = [
        TagDimension::Functionality,
        TagDimension::Time,
        TagDimension::Ambience,
        TagDimension::Mode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagDimension::Functionality => "functionality",
            TagDimension::Time => "time",
            TagDimension::Ambience => "ambience",
            TagDimension::Mode => "mode",
        }
    }
}

/// One controlled-vocabulary label. Curated once from the LLM proposal;
/// afterwards every downstream tag reference must use an existing id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyTag {
    /// snake_case English identifier.
    pub id: String,
    pub dimension: TagDimension,
    /// English label.
    pub label: String,
    /// Traditional Chinese label.
    pub label_zh: String,
}
