use serde::{Deserialize, Serialize};

/// Embedded venue text plus provenance.
///
/// The exact embedded text is retained so searches and audits are
/// reproducible without re-deriving anything from raw reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub seed_id: String,
    pub place_id: String,
    pub name: String,
    pub embedding: Vec<f32>,
    pub embedded_text: String,
    pub model_id: String,
    pub embedded_at: String,
}
