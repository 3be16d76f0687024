//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod history;
pub mod pick;
pub mod search;
pub mod serve;
pub mod status;
pub mod teleport;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// AI place search and simulated location teleport
#[derive(Parser)]
#[command(name = "smartloc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for a place by name
    Search(search::SearchArgs),

    /// Show the candidate a map click would produce
    Pick(pick::PickArgs),

    /// Search, select and teleport to a place
    Teleport(teleport::TeleportArgs),

    /// View and manage teleport history
    History(history::HistoryArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Show provider, history and server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    // The server logs progress; one-shot commands only surface warnings
    let default_filter = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_logging(default_filter);

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Pick(args) => pick::run(args),
        Commands::Teleport(args) => teleport::run(args).await,
        Commands::History(args) => history::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Serve(args) => serve::run(args).await,
        Commands::Status(args) => status::run(args).await,
    }
}

/// Initialize logging, honouring RUST_LOG
fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
