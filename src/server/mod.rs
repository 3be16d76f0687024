//! HTTP server for smartloc
//!
//! Exposes search, selection, teleport and history as a JSON API for a
//! browser map shell.

pub mod routes;
pub mod state;

use crate::app::App;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::get_geocoder;
use crate::geo::search::SearchOrchestrator;
use crate::storage::FileStore;
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Start the HTTP server on the configured address
///
/// Never returns unless the server shuts down
pub async fn run(config: Config) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config).await
}

/// Start the HTTP server with a specific address
pub async fn run_on(addr: &str, config: Config) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let store = FileStore::open()?;
    info!("History stored in {}", store.dir().display());

    let provider = get_geocoder(&config)?;
    let search = SearchOrchestrator::new(provider).with_max_results(config.search.max_results);
    let app = App::from_config(&config, store);

    let state = Arc::new(AppState::new(config, search, app));
    let router = create_router(state);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}
