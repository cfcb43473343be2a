use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cafedex - offline coffee-venue catalog pipeline
#[derive(Parser, Debug)]
#[command(name = "cafedex")]
#[command(about = "Offline batch pipeline for a verified, searchable coffee-venue catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter the raw seed feed into cleaned venues
    Seed(SeedArgs),

    /// Resolve cleaned venues against the place-search provider
    Verify(VerifyArgs),

    /// Fetch full details (reviews, photos) for verified venues
    Scrape(ScrapeArgs),

    /// Propose the tag taxonomy from sampled reviews
    TaxonomySeed(TaxonomySeedArgs),

    /// Classify every venue against the curated taxonomy
    Enrich(EnrichArgs),

    /// Score tag distinctiveness and infer usage modes
    Postprocess(PostprocessArgs),

    /// Embed the composed venue texts
    Embed(EmbedArgs),

    /// Evaluate search quality over a fixed query set
    SearchEval(SearchEvalArgs),
}

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Path to the raw seed feed JSON file
    pub input: PathBuf,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {}

#[derive(Parser, Debug)]
pub struct ScrapeArgs {}

#[derive(Parser, Debug)]
pub struct TaxonomySeedArgs {
    /// Generation model override
    #[arg(long)]
    pub model: Option<String>,

    /// Reviews sampled per venue for the proposal prompt
    #[arg(long, default_value = "2")]
    pub per_venue: usize,
}

#[derive(Parser, Debug)]
pub struct EnrichArgs {
    /// Generation model override
    #[arg(long)]
    pub model: Option<String>,

    /// Venue index to start at (throughput knob; resume is by id)
    #[arg(long, default_value = "0")]
    pub start_from: usize,

    /// Classify a single venue and stop
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct PostprocessArgs {}

#[derive(Parser, Debug)]
pub struct EmbedArgs {
    /// Embedding model override
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SearchEvalArgs {
    /// Path to the query set JSON file
    pub queries: PathBuf,

    /// Results kept per query
    #[arg(long, default_value = "5")]
    pub top_k: usize,
}
