//! Cafedex Pipeline - stage orchestration
//!
//! Batch stages, each reading the previous stage's checkpoint
//! document and writing its own:
//!
//! seed -> verify -> scrape -> taxonomy-seed -> enrich -> postprocess
//! -> embed -> search-eval
//!
//! Stages are single-threaded and run to completion; the enrichment
//! and embedding stages additionally checkpoint after every item/batch
//! and resume by id, so an interrupted run loses at most one in-flight
//! item.

pub mod checkpoint;
pub mod embed;
pub mod enrich;
pub mod postprocess;
pub mod scrape;
pub mod search_eval;
pub mod seed;
pub mod taxonomy;
pub mod verify;
