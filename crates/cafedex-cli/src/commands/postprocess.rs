use anyhow::Result;

use cafedex_core::config::PipelineConfig;
use cafedex_core::models::EnrichedVenue;
use cafedex_pipeline::checkpoint::{self, files};
use cafedex_pipeline::postprocess::run_postprocess;

use crate::cli::PostprocessArgs;
use crate::output::OutputWriter;

pub fn execute(
    _args: PostprocessArgs,
    config: &PipelineConfig,
    output: &OutputWriter,
) -> Result<()> {
    let venues: Vec<EnrichedVenue> = checkpoint::read(&config.checkpoint_path(files::ENRICHED))?;

    let outcome = run_postprocess(&venues);

    let path = config.checkpoint_path(files::PROCESSED);
    checkpoint::write(&path, &outcome.venues)?;

    if output.is_json() {
        output.result(&outcome.stats)?;
        return Ok(());
    }

    output.section("Postprocess");
    output.kv("Venues", outcome.stats.total_venues);
    output.kv(
        "Average tags per venue",
        format!("{:.1}", outcome.stats.average_tags_per_venue),
    );
    for (mode, count) in &outcome.stats.mode_histogram {
        output.kv(format!("Mode {mode}"), count);
    }

    output.section("Most distinctive tags");
    for (tag, idf) in &outcome.stats.most_distinctive_tags {
        output.kv(tag, format!("{idf:.3}"));
    }
    output.section("Least distinctive tags");
    for (tag, idf) in &outcome.stats.least_distinctive_tags {
        output.kv(tag, format!("{idf:.3}"));
    }

    output.success(format!("Wrote {}", path.display()));
    Ok(())
}
