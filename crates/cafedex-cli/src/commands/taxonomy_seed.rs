use anyhow::Result;

use cafedex_core::config::PipelineConfig;
use cafedex_core::models::EnrichableVenue;
use cafedex_pipeline::checkpoint::{self, files};
use cafedex_pipeline::taxonomy::run_taxonomy_seed;
use cafedex_providers::anthropic::AnthropicGenerator;

use crate::cli::TaxonomySeedArgs;
use crate::commands::retry_policy;
use crate::credentials;
use crate::output::OutputWriter;

pub async fn execute(
    args: TaxonomySeedArgs,
    config: &PipelineConfig,
    output: &OutputWriter,
) -> Result<()> {
    let venues: Vec<EnrichableVenue> = checkpoint::read(&config.checkpoint_path(files::SCRAPED))?;
    let api_key = credentials::require(credentials::ANTHROPIC_API_KEY)?;
    let model = args.model.unwrap_or_else(|| config.generation_model.value.clone());
    let generator = AnthropicGenerator::new(api_key, model, retry_policy(config));

    let outcome = run_taxonomy_seed(&venues, &generator, args.per_venue).await?;

    let path = config.checkpoint_path(files::TAXONOMY_PROPOSED);
    checkpoint::write(&path, &outcome.tags)?;

    output.section("Taxonomy proposal");
    output.kv("Venues", venues.len());
    output.kv("Proposed tags", outcome.tags.len());
    output.kv("Input tokens", outcome.input_tokens);
    output.kv("Output tokens", outcome.output_tokens);
    output.success(format!("Wrote {}", path.display()));
    output.info(format!(
        "Curate the proposal manually and save it as {}",
        config.checkpoint_path(files::TAXONOMY).display()
    ));
    Ok(())
}
