//! Domain model types, one module per pipeline lifecycle step.
//!
//! Each type is produced by exactly one stage and is immutable once
//! written to its checkpoint; later stages consume, never mutate.

pub mod embedding;
pub mod enrichment;
pub mod place;
pub mod seed;
pub mod taxonomy;
pub mod venue;

pub use embedding::EmbeddingRecord;
pub use enrichment::{
    EnrichedVenue, EnrichmentRecord, EnrichmentMode, ProcessedEnrichment, ProcessedVenue,
    ScoredTag, TagAssignment, VenueMode,
};
pub use place::{CandidatePlace, PhotoCategory, PhotoData, ReviewData};
pub use seed::{CleanedVenue, SeedRecord};
pub use taxonomy::{TagDimension, TaxonomyTag};
pub use venue::{EnrichableVenue, UnmatchedReason, UnmatchedVenue, VerifiedVenue};
