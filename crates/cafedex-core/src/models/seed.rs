use serde::{Deserialize, Serialize};

/// Raw venue entry from the crowd-sourced seed feed.
///
/// Coordinates arrive as strings and community attributes as loosely
/// typed values; nothing here is trusted until the seed filter has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    /// Social/profile URL published by the venue.
    #[serde(default)]
    pub url: String,
    /// Nearest metro stop, free text.
    #[serde(default)]
    pub mrt: String,
    /// "yes" | "no" | "maybe"
    #[serde(default)]
    pub limited_time: String,
    /// "yes" | "no" | "maybe"
    #[serde(default)]
    pub socket: String,
    // Community scores (0-5), carried through unmodified.
    #[serde(default)]
    pub wifi: f64,
    #[serde(default)]
    pub seat: f64,
    #[serde(default)]
    pub quiet: f64,
}

/// Seed record after filtering: coordinates parsed, closed/shell/
/// out-of-bounds/duplicate entries removed.
///
/// Invariant: one entry per (name, location cluster within 50 m).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedVenue {
    pub seed_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub social_url: String,
    pub mrt: String,
    pub limited_time: String,
    pub socket: String,
}
