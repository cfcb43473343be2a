use anyhow::Result;

use cafedex_core::config::PipelineConfig;
use cafedex_core::models::{EnrichableVenue, EnrichedVenue, TaxonomyTag};
use cafedex_pipeline::checkpoint::{self, files};
use cafedex_pipeline::enrich::{run_enrich, EnrichOptions};
use cafedex_providers::anthropic::AnthropicGenerator;

use crate::cli::EnrichArgs;
use crate::commands::retry_policy;
use crate::credentials;
use crate::output::OutputWriter;

pub async fn execute(
    args: EnrichArgs,
    config: &PipelineConfig,
    output: &OutputWriter,
) -> Result<()> {
    let venues: Vec<EnrichableVenue> = checkpoint::read(&config.checkpoint_path(files::SCRAPED))?;
    let taxonomy: Vec<TaxonomyTag> = checkpoint::read(&config.checkpoint_path(files::TAXONOMY))?;

    let checkpoint_path = config.checkpoint_path(files::ENRICHED);
    let existing: Vec<EnrichedVenue> = checkpoint::read_or_default(&checkpoint_path)?;
    if !existing.is_empty() {
        output.info(format!("Resuming: {} venues already enriched", existing.len()));
    }

    let api_key = credentials::require(credentials::ANTHROPIC_API_KEY)?;
    let model = args.model.unwrap_or_else(|| config.generation_model.value.clone());
    let generator = AnthropicGenerator::new(api_key, model, retry_policy(config));

    let options = EnrichOptions {
        start_from: args.start_from,
        limit: if args.dry_run { Some(1) } else { None },
    };

    let outcome = run_enrich(
        &venues,
        &taxonomy,
        &generator,
        existing,
        &options,
        &mut |snapshot| checkpoint::write(&checkpoint_path, &snapshot.to_vec()),
    )
    .await?;

    output.section("Enrichment");
    output.kv("Input", outcome.stats.total_input);
    output.kv("Skipped (already done)", outcome.stats.skipped_existing);
    output.kv("Enriched", outcome.stats.enriched);
    output.kv("Failed", outcome.stats.failed);
    output.kv("Input tokens", outcome.stats.input_tokens);
    output.kv("Output tokens", outcome.stats.output_tokens);
    output.success(format!("Wrote {}", checkpoint_path.display()));
    Ok(())
}
