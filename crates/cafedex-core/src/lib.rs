//! Cafedex Core - Domain models, matching, scoring, and port definitions
//!
//! This crate contains the core domain logic for the cafedex catalog
//! pipeline: geo/text primitives, the chain dictionary, the seed filter
//! rules, the chain-aware entity resolver, tag scoring, embedding-text
//! composition, and the search ranker. Provider adapters and stage
//! orchestration live in sibling crates.

pub mod chains;
pub mod compose;
pub mod config;
pub mod error;
pub mod filters;
pub mod geo;
pub mod matching;
pub mod models;
pub mod ports;
pub mod scoring;
pub mod search;
pub mod text;

pub use error::{CafedexError, Result};
