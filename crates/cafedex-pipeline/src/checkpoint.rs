//! Checkpoint documents: one pretty-printed JSON file per stage.
//!
//! Reading a stage's own input is the only fatal error surface in the
//! pipeline; reading a stage's *previous output* for resume is always
//! optional and an absent file just means "start fresh".

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use cafedex_core::error::{CafedexError, Result};

/// Conventional checkpoint file names under the data directory.
pub mod files {
    pub const SEED: &str = "seed.json";
    pub const VERIFIED: &str = "verified.json";
    pub const UNMATCHED: &str = "unmatched.json";
    pub const SCRAPED: &str = "scraped.json";
    pub const TAXONOMY_PROPOSED: &str = "taxonomy-proposed.json";
    pub const TAXONOMY: &str = "taxonomy.json";
    pub const ENRICHED: &str = "enriched.json";
    pub const PROCESSED: &str = "processed.json";
    pub const EMBEDDINGS: &str = "embeddings.json";
    pub const SEARCH_RESULTS: &str = "search-results.json";
}

/// Reads a required checkpoint. Missing file or parse failure aborts
/// the stage.
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(CafedexError::CheckpointMissing { path: path.to_path_buf() });
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CafedexError::CheckpointCorrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Reads a stage's own previous output for resume. An absent file
/// yields the default (empty) value; a present-but-corrupt file is
/// still an error, since silently restarting would duplicate work.
pub fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    read(path)
}

/// Writes a checkpoint, creating the data directory if needed.
pub fn write<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}
