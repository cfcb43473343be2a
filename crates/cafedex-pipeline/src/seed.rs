//! Seed filter stage: raw feed entries to cleaned venues.

use serde::{Deserialize, Serialize};
use tracing::info;

use cafedex_core::filters::{
    find_duplicates, is_known_closed, is_shell_entry, parse_coordinate, BoundingBox,
};
use cafedex_core::models::{CleanedVenue, SeedRecord};

/// Drop counts per filter rule, in application order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedStats {
    pub total_input: usize,
    pub filtered_closed: usize,
    pub filtered_shell: usize,
    pub filtered_bounds: usize,
    pub filtered_duplicates: usize,
    pub total_output: usize,
}

#[derive(Debug, Clone)]
pub struct SeedOutcome {
    pub venues: Vec<CleanedVenue>,
    pub stats: SeedStats,
}

/// Applies the filter rules in order: closed-marker names, shell
/// entries, bounding box, then duplicate removal over the parsed
/// survivors. Each record is counted against the first rule it fails.
pub fn run_seed(records: &[SeedRecord], bounds: &BoundingBox) -> SeedOutcome {
    let mut stats = SeedStats { total_input: records.len(), ..SeedStats::default() };
    let mut cleaned: Vec<CleanedVenue> = Vec::new();

    for record in records {
        if is_known_closed(&record.name) {
            stats.filtered_closed += 1;
            continue;
        }
        if is_shell_entry(record) {
            stats.filtered_shell += 1;
            continue;
        }

        // is_shell_entry already proved both coordinates parse.
        let latitude = parse_coordinate(&record.latitude).unwrap_or_default();
        let longitude = parse_coordinate(&record.longitude).unwrap_or_default();

        if !bounds.contains(latitude, longitude) {
            stats.filtered_bounds += 1;
            continue;
        }

        cleaned.push(CleanedVenue {
            seed_id: record.id.clone(),
            name: record.name.trim().to_string(),
            address: record.address.trim().to_string(),
            latitude,
            longitude,
            social_url: record.url.clone(),
            mrt: record.mrt.clone(),
            limited_time: record.limited_time.clone(),
            socket: record.socket.clone(),
        });
    }

    let dropped = find_duplicates(&cleaned);
    stats.filtered_duplicates = dropped.len();
    let venues: Vec<CleanedVenue> =
        cleaned.into_iter().filter(|v| !dropped.contains(&v.seed_id)).collect();
    stats.total_output = venues.len();

    info!(
        input = stats.total_input,
        closed = stats.filtered_closed,
        shell = stats.filtered_shell,
        out_of_bounds = stats.filtered_bounds,
        duplicates = stats.filtered_duplicates,
        output = stats.total_output,
        "seed filter complete"
    );

    SeedOutcome { venues, stats }
}
