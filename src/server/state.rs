//! Server shared state
//!
//! Holds the single application controller, the search orchestrator and
//! the teleport timer task.

use crate::app::App;
use crate::config::Config;
use crate::geo::search::SearchOrchestrator;
use crate::geo::{GeocodeProvider, SearchResult};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Shared state for the HTTP server
pub struct AppState<P, S> {
    /// Configuration
    pub config: Config,

    /// Application controller
    pub app: Mutex<App<S>>,

    search: SearchOrchestrator<P>,

    /// Task delivering teleport ticks
    timer: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl<P, S> AppState<P, S>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    /// Create new server state
    pub fn new(config: Config, search: SearchOrchestrator<P>, app: App<S>) -> Self {
        Self {
            config,
            app: Mutex::new(app),
            search,
            timer: std::sync::Mutex::new(None),
        }
    }

    /// The search orchestrator
    pub fn search(&self) -> &SearchOrchestrator<P> {
        &self.search
    }

    /// Run a search and publish its results
    ///
    /// The app lock is not held during the provider call, so the latest
    /// response to arrive wins.
    pub async fn run_search(&self, query: &str) -> Vec<SearchResult> {
        let results = self.search.search(query).await;
        self.app.lock().await.search_completed(results.clone());
        results
    }

    /// Replace the teleport timer task
    ///
    /// Call while holding the app lock so the aborted task cannot tick the
    /// new phase.
    pub fn restart_timer(self: &Arc<Self>) {
        let state = Arc::clone(self);
        let handle = tokio::spawn(async move { state.drive_timer().await });

        let mut timer = self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = timer.replace(handle) {
            previous.abort();
        }
    }

    /// Sleep until each transition and tick until the lifecycle is idle
    async fn drive_timer(&self) {
        loop {
            let Some(wait) = self.app.lock().await.next_deadline() else {
                debug!("Teleport timer finished");
                return;
            };

            let started = Instant::now();
            tokio::time::sleep(wait).await;
            self.app.lock().await.tick(started.elapsed());
        }
    }
}
