use anyhow::{Context, Result};
use std::fs;

use cafedex_core::config::PipelineConfig;
use cafedex_core::models::SeedRecord;
use cafedex_pipeline::checkpoint::{self, files};
use cafedex_pipeline::seed::run_seed;

use crate::cli::SeedArgs;
use crate::output::OutputWriter;

pub fn execute(args: SeedArgs, config: &PipelineConfig, output: &OutputWriter) -> Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read seed feed {}", args.input.display()))?;
    let records: Vec<SeedRecord> =
        serde_json::from_str(&raw).context("failed to parse seed feed")?;

    let outcome = run_seed(&records, &config.bounds.value);

    let path = config.checkpoint_path(files::SEED);
    checkpoint::write(&path, &outcome.venues)?;

    output.section("Seed filter");
    output.kv("Input", outcome.stats.total_input);
    output.kv("Closed", outcome.stats.filtered_closed);
    output.kv("Shell", outcome.stats.filtered_shell);
    output.kv("Out of bounds", outcome.stats.filtered_bounds);
    output.kv("Duplicates", outcome.stats.filtered_duplicates);
    output.kv("Output", outcome.stats.total_output);
    output.success(format!("Wrote {}", path.display()));
    Ok(())
}
