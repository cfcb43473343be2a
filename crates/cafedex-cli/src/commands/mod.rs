//! Command implementations, one per pipeline stage.

mod embed;
mod enrich;
mod postprocess;
mod scrape;
mod search_eval;
mod seed;
mod taxonomy_seed;
mod verify;

use std::time::Duration;

use anyhow::Result;

use cafedex_core::config::PipelineConfig;
use cafedex_providers::RetryPolicy;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Seed(args) => seed::execute(args, &config, &output),
        Commands::Verify(args) => verify::execute(args, &config, &output).await,
        Commands::Scrape(args) => scrape::execute(args, &config, &output).await,
        Commands::TaxonomySeed(args) => taxonomy_seed::execute(args, &config, &output).await,
        Commands::Enrich(args) => enrich::execute(args, &config, &output).await,
        Commands::Postprocess(args) => postprocess::execute(args, &config, &output),
        Commands::Embed(args) => embed::execute(args, &config, &output).await,
        Commands::SearchEval(args) => search_eval::execute(args, &config, &output).await,
    }
}

/// Retry policy from the configured knobs, shared by every provider.
fn retry_policy(config: &PipelineConfig) -> RetryPolicy {
    RetryPolicy::new(
        config.max_retries.value,
        Duration::from_millis(config.retry_base_delay_ms.value),
    )
}
