//! History command handler
//!
//! View and clear the teleport history.

use crate::error::Result;
use crate::history::History;
use crate::storage::FileStore;
use chrono::{Local, TimeZone};
use clap::{Args, Subcommand};

/// History command arguments
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: Option<HistoryCommand>,

    /// Number of entries to show (default: 10)
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,
}

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List history entries
    List {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
    /// Clear all history
    Clear,
}

/// Run the history command
pub fn run(args: HistoryArgs) -> Result<()> {
    let command = args.command.unwrap_or(HistoryCommand::List { count: args.count });
    let history = History::load(FileStore::open()?);

    match command {
        HistoryCommand::List { count } => list_history(&history, count),
        HistoryCommand::Clear => clear_history(history),
    }

    Ok(())
}

/// List recent history entries
fn list_history(history: &History<FileStore>, count: usize) {
    if history.is_empty() {
        println!("No history entries.");
        return;
    }

    println!(
        "Recent teleports ({} of {}):\n",
        count.min(history.len()),
        history.len()
    );

    for entry in history.recent(count) {
        let when = Local
            .timestamp_millis_opt(entry.timestamp)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| entry.timestamp.to_string());

        let short_id: String = entry.id.chars().take(8).collect();

        println!(
            "  {} - {}\n    {}\n    ({:.6}, {:.6}) | {}\n",
            short_id,
            entry.name,
            entry.address,
            entry.lat,
            entry.lng,
            when
        );
    }
}

/// Clear all history
fn clear_history(mut history: History<FileStore>) {
    let count = history.len();
    history.clear();
    println!("Cleared {} history entries.", count);
}
