use anyhow::Result;

use cafedex_core::config::PipelineConfig;
use cafedex_core::models::VerifiedVenue;
use cafedex_pipeline::checkpoint::{self, files};
use cafedex_pipeline::scrape::run_scrape;
use cafedex_providers::apify::ApifyPlaces;

use crate::cli::ScrapeArgs;
use crate::commands::retry_policy;
use crate::credentials;
use crate::output::OutputWriter;

pub async fn execute(
    _args: ScrapeArgs,
    config: &PipelineConfig,
    output: &OutputWriter,
) -> Result<()> {
    let venues: Vec<VerifiedVenue> = checkpoint::read(&config.checkpoint_path(files::VERIFIED))?;
    let token = credentials::require(credentials::APIFY_TOKEN)?;
    let places = ApifyPlaces::new(token, retry_policy(config));

    let outcome = run_scrape(&venues, &places).await?;

    let path = config.checkpoint_path(files::SCRAPED);
    checkpoint::write(&path, &outcome.venues)?;

    if outcome.stats.missing > 0 {
        output.warning(format!(
            "{} venues returned no scrape result; re-run scrape to retry them",
            outcome.stats.missing
        ));
    }

    output.section("Scrape");
    output.kv("Input", outcome.stats.total_input);
    output.kv("Scraped", outcome.stats.scraped);
    output.kv("Missing", outcome.stats.missing);
    output.kv("With reviews", outcome.stats.with_reviews);
    output.kv("With photos", outcome.stats.with_photos);
    output.kv("With menu", outcome.stats.with_menu);
    output.success(format!("Wrote {}", path.display()));
    Ok(())
}
