//! Search command handler
//!
//! Resolves a place name to up to three candidates.

use crate::config::Config;
use crate::error::Result;
use crate::geo::search::SearchOrchestrator;
use crate::geo::{get_geocoder, SearchResult};
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name, landmark or address
    pub query: String,

    /// Maximum number of candidates (1-3)
    #[arg(long, short = 'n')]
    pub max_results: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let orchestrator = orchestrator(&config, args.max_results)?;

    let results = orchestrator.search(&args.query).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (index, result) in results.iter().enumerate() {
        print_result(index, result);
    }

    Ok(())
}

/// Build the orchestrator from config
pub(crate) fn orchestrator(
    config: &Config,
    max_results: Option<usize>,
) -> Result<SearchOrchestrator<crate::geo::gemini::GeminiClient>> {
    Ok(SearchOrchestrator::new(get_geocoder(config)?)
        .with_max_results(max_results.unwrap_or(config.search.max_results)))
}

/// Print one candidate
pub(crate) fn print_result(index: usize, result: &SearchResult) {
    println!(
        "  [{}] {}\n      {}\n      ({:.6}, {:.6})",
        index, result.name, result.address, result.lat, result.lng
    );
    if !result.description.is_empty() {
        println!("      {}", result.description);
    }
    println!();
}
