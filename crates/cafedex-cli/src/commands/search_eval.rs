use anyhow::{Context, Result};
use std::fs;

use cafedex_core::config::PipelineConfig;
use cafedex_core::models::{EmbeddingRecord, ProcessedVenue, TaxonomyTag};
use cafedex_pipeline::checkpoint::{self, files};
use cafedex_pipeline::search_eval::{run_search_eval, SearchQuery};
use cafedex_providers::openai::OpenAiEmbedder;

use crate::cli::SearchEvalArgs;
use crate::commands::retry_policy;
use crate::credentials;
use crate::output::OutputWriter;

pub async fn execute(
    args: SearchEvalArgs,
    config: &PipelineConfig,
    output: &OutputWriter,
) -> Result<()> {
    let embeddings: Vec<EmbeddingRecord> =
        checkpoint::read(&config.checkpoint_path(files::EMBEDDINGS))?;
    let processed: Vec<ProcessedVenue> =
        checkpoint::read(&config.checkpoint_path(files::PROCESSED))?;
    let taxonomy: Vec<TaxonomyTag> = checkpoint::read(&config.checkpoint_path(files::TAXONOMY))?;

    let raw = fs::read_to_string(&args.queries)
        .with_context(|| format!("failed to read query set {}", args.queries.display()))?;
    let queries: Vec<SearchQuery> =
        serde_json::from_str(&raw).context("failed to parse query set")?;

    let api_key = credentials::require(credentials::OPENAI_API_KEY)?;
    let embedder =
        OpenAiEmbedder::new(api_key, config.embedding_model.value.clone(), retry_policy(config));

    let reports = run_search_eval(
        &queries,
        &embeddings,
        &processed,
        &taxonomy,
        &embedder,
        args.top_k,
    )
    .await?;

    let path = config.checkpoint_path(files::SEARCH_RESULTS);
    checkpoint::write(&path, &reports)?;

    for report in &reports {
        output.section(format!("\"{}\" ({})", report.query, report.category));
        for result in &report.results {
            let matched = if result.matched_tag_ids.is_empty() {
                String::new()
            } else {
                format!(" (+{})", result.matched_tag_ids.join(", "))
            };
            output.kv(
                result.rank,
                format!("{} {:.4}{}", result.name, result.boosted_score, matched),
            );
        }
    }

    output.success(format!(
        "Evaluated {} queries, wrote {}",
        reports.len(),
        path.display()
    ));
    output.info("Review the ranked results manually and score each query pass/fail");
    Ok(())
}
