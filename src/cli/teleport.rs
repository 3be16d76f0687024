//! Teleport command handler
//!
//! Searches, selects a candidate and runs the teleport lifecycle in real
//! time, persisting the result to history.

use crate::app::App;
use crate::cli::search::{orchestrator, print_result};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::FileStore;
use clap::Args;

/// Teleport command arguments
#[derive(Args)]
pub struct TeleportArgs {
    /// Place to search for
    #[arg(required_unless_present = "history", conflicts_with = "history")]
    pub query: Option<String>,

    /// Candidate to select (0-based)
    #[arg(long, short = 'i', default_value = "0")]
    pub index: usize,

    /// Teleport to a history entry instead (ID or ID prefix)
    #[arg(long)]
    pub history: Option<String>,
}

/// Run the teleport command
pub async fn run(args: TeleportArgs) -> Result<()> {
    let config = Config::load()?;
    let mut app = App::from_config(&config, FileStore::open()?);

    match (&args.query, &args.history) {
        (_, Some(prefix)) => {
            let id = app
                .history()
                .entries()
                .iter()
                .find(|entry| entry.id.starts_with(prefix.as_str()))
                .map(|entry| entry.id.clone())
                .ok_or_else(|| Error::Config(format!("History entry not found: {}", prefix)))?;
            app.select_history(&id);
        }
        (Some(query), None) => {
            let results = orchestrator(&config, None)?.search(query).await;
            if results.is_empty() {
                println!("No results.");
                return Ok(());
            }

            let result = results.get(args.index).cloned().ok_or_else(|| {
                Error::Config(format!(
                    "Candidate index {} out of range (found {})",
                    args.index,
                    results.len()
                ))
            })?;
            print_result(args.index, &result);

            app.search_completed(results);
            app.select_result(result);
        }
        (None, None) => return Err(Error::Config("Nothing to teleport to".to_string())),
    }

    let Some(target) = app.state().selected.clone() else {
        return Ok(());
    };

    let mut last_status = app.teleport().status.clone();
    print_status(last_status.as_deref());

    while let Some(wait) = app.next_deadline() {
        tokio::time::sleep(wait).await;
        let status = app.tick(wait).status.clone();
        if status != last_status {
            print_status(status.as_deref());
            last_status = status;
        }
    }

    println!(
        "  {}",
        config.format_url(None, target.lat, target.lng, &target.name)?
    );

    Ok(())
}

fn print_status(status: Option<&str>) {
    if let Some(status) = status {
        println!("{}", status);
    }
}
