use anyhow::Result;

use cafedex_core::config::PipelineConfig;
use cafedex_core::models::CleanedVenue;
use cafedex_pipeline::checkpoint::{self, files};
use cafedex_pipeline::verify::run_verify;
use cafedex_providers::apify::ApifyPlaces;

use crate::cli::VerifyArgs;
use crate::commands::retry_policy;
use crate::credentials;
use crate::output::OutputWriter;

pub async fn execute(
    _args: VerifyArgs,
    config: &PipelineConfig,
    output: &OutputWriter,
) -> Result<()> {
    let venues: Vec<CleanedVenue> = checkpoint::read(&config.checkpoint_path(files::SEED))?;
    let token = credentials::require(credentials::APIFY_TOKEN)?;
    let places = ApifyPlaces::new(token, retry_policy(config));

    let outcome = run_verify(&venues, &places).await?;

    checkpoint::write(&config.checkpoint_path(files::VERIFIED), &outcome.verified)?;
    checkpoint::write(&config.checkpoint_path(files::UNMATCHED), &outcome.unmatched)?;

    output.section("Verification");
    output.kv("Input", outcome.stats.total_input);
    output.kv("Matched", outcome.stats.matched);
    output.kv("High confidence", outcome.stats.high_confidence);
    output.kv("Medium confidence", outcome.stats.medium_confidence);
    output.kv("Unmatched", outcome.stats.unmatched);
    output.success(format!(
        "Wrote {} and {}",
        config.checkpoint_path(files::VERIFIED).display(),
        config.checkpoint_path(files::UNMATCHED).display()
    ));
    Ok(())
}
