use anyhow::Result;

use cafedex_core::config::PipelineConfig;
use cafedex_core::models::{EmbeddingRecord, EnrichedVenue, TaxonomyTag};
use cafedex_pipeline::checkpoint::{self, files};
use cafedex_pipeline::embed::run_embed;
use cafedex_providers::openai::OpenAiEmbedder;

use crate::cli::EmbedArgs;
use crate::commands::retry_policy;
use crate::credentials;
use crate::output::OutputWriter;

pub async fn execute(
    args: EmbedArgs,
    config: &PipelineConfig,
    output: &OutputWriter,
) -> Result<()> {
    let venues: Vec<EnrichedVenue> = checkpoint::read(&config.checkpoint_path(files::ENRICHED))?;
    let taxonomy: Vec<TaxonomyTag> = checkpoint::read(&config.checkpoint_path(files::TAXONOMY))?;

    let checkpoint_path = config.checkpoint_path(files::EMBEDDINGS);
    let existing: Vec<EmbeddingRecord> = checkpoint::read_or_default(&checkpoint_path)?;
    if !existing.is_empty() {
        output.info(format!("Resuming: {} venues already embedded", existing.len()));
    }

    let api_key = credentials::require(credentials::OPENAI_API_KEY)?;
    let model = args.model.unwrap_or_else(|| config.embedding_model.value.clone());
    let embedder = OpenAiEmbedder::new(api_key, model, retry_policy(config));

    let outcome = run_embed(
        &venues,
        &taxonomy,
        &embedder,
        existing,
        config.embedding_batch_size.value,
        &mut |snapshot| checkpoint::write(&checkpoint_path, &snapshot.to_vec()),
    )
    .await?;

    output.section("Embedding");
    output.kv("Input", outcome.stats.total_input);
    output.kv("Skipped (already done)", outcome.stats.skipped_existing);
    output.kv("Embedded", outcome.stats.embedded);
    output.kv("Failed", outcome.stats.failed);
    if let Some(record) = outcome.records.first() {
        output.kv("Dimensions", record.embedding.len());
    }
    output.success(format!("Wrote {}", checkpoint_path.display()));
    Ok(())
}
