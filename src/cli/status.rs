//! Status command handler
//!
//! Shows the geocoding provider setup, history size and server status.

use crate::config::Config;
use crate::error::Result;
use crate::geo::gemini::resolve_api_key;
use crate::geo::{get_geocoder, GeocodeProvider};
use crate::history::History;
use crate::storage::FileStore;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    if args.server {
        check_server_status(&config).await;
    }

    println!("smartloc v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let client = get_geocoder(&config)?;
    println!("Provider: {} ({})", client.name(), client.model());
    println!("  Endpoint: {}", config.search.base_url);
    let configured = Some(config.api_keys.gemini.as_str()).filter(|key| !key.is_empty());
    let key_status = match resolve_api_key(configured, |name| std::env::var(name).ok()) {
        Some(_) => "configured",
        None => "MISSING (set GEMINI_API_KEY or api_keys.gemini)",
    };
    println!("  API key: {}", key_status);
    println!();

    let store = FileStore::open()?;
    let history = History::load(store);
    println!("History: {} entries", history.len());
    println!("  Stored in: {}", history.store().dir().display());
    if let Some(latest) = history.entries().first() {
        println!("  Latest: {} ({:.6}, {:.6})", latest.name, latest.lat, latest.lng);
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(provider) = status.get("provider").and_then(|v| v.as_str()) {
                        println!("  Provider: {}", provider);
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
