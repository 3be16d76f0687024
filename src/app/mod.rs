//! Selection and teleport controller
//!
//! [`App`] owns the [`AppState`], the history store and the teleport timings.
//! Presentation layers (CLI, HTTP server) hold an `App` and feed it actions.

pub mod state;
pub mod teleport;

use crate::config::Config;
use crate::coord::{CoordinateSystem, Coordinates};
use crate::error::Result;
use crate::geo::SearchResult;
use crate::history::{History, Location};
use crate::storage::KeyValueStore;
use state::{Action, AppState, Effect, Preset};
use std::str::FromStr;
use std::time::Duration;
use teleport::TeleportTimings;
use tracing::{info, warn};

/// Application controller
#[derive(Debug)]
pub struct App<S> {
    state: AppState,
    history: History<S>,
    timings: TeleportTimings,
}

impl<S: KeyValueStore> App<S> {
    /// Create an app over a loaded history
    pub fn new(history: History<S>, timings: TeleportTimings) -> Self {
        let state = AppState {
            history: history.entries().to_vec(),
            ..AppState::default()
        };
        Self {
            state,
            history,
            timings,
        }
    }

    /// Create an app from config, loading history from `store`
    pub fn from_config(config: &Config, store: S) -> Self {
        let mut app = Self::new(History::load(store), TeleportTimings::from(&config.teleport));

        app.state.preset = Preset::from_str(&config.location.default_preset).unwrap_or_else(|e| {
            warn!("{}; using default preset", e);
            Preset::default()
        });

        let initial = Coordinates::new(config.location.initial_lat, config.location.initial_lng);
        if initial.is_valid() {
            app.state.position = initial;
        } else {
            warn!("Ignoring invalid initial position {:?}", initial);
        }
        app
    }

    /// Current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The history store
    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn timings(&self) -> TeleportTimings {
        self.timings
    }

    /// Run an action through the reducer and apply its effect
    pub fn dispatch(&mut self, action: Action) -> &AppState {
        let (next, effect) = std::mem::take(&mut self.state).reduce(action, self.timings);
        self.state = next;

        if let Some(effect) = effect {
            match effect {
                Effect::Commit(target) => {
                    let location = Location::from_result(&target);
                    info!(
                        "Teleported to {} ({:.6}, {:.6})",
                        location.name, location.lat, location.lng
                    );
                    self.history.add(location);
                }
                Effect::ClearHistory => self.history.clear(),
            }
            self.state.history = self.history.entries().to_vec();
        }

        &self.state
    }

    /// Show search results
    pub fn search_completed(&mut self, results: Vec<SearchResult>) -> &AppState {
        self.dispatch(Action::SearchCompleted(results))
    }

    /// Select a candidate
    pub fn select_result(&mut self, result: SearchResult) -> &AppState {
        self.dispatch(Action::Select(result))
    }

    /// Select a history entry; `None` if the id is unknown
    pub fn select_history(&mut self, id: &str) -> Option<&AppState> {
        self.history.get(id)?;
        Some(self.dispatch(Action::SelectHistory(id.to_string())))
    }

    /// Select the point under a map click
    ///
    /// Converts to GCJ-02 first and rejects out-of-range pairs.
    pub fn pick(&mut self, coords: Coordinates, system: CoordinateSystem) -> Result<&AppState> {
        coords.validate()?;
        let coords = system.to_gcj02(coords);
        Ok(self.dispatch(Action::Pick(coords)))
    }

    /// Confirm the current selection
    pub fn teleport(&mut self) -> &AppState {
        self.dispatch(Action::Teleport)
    }

    /// Advance virtual time
    pub fn tick(&mut self, elapsed: Duration) -> &AppState {
        self.dispatch(Action::Tick(elapsed))
    }

    pub fn clear_history(&mut self) -> &AppState {
        self.dispatch(Action::ClearHistory)
    }

    /// Time until the next teleport transition
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.teleport.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::storage::HISTORY_KEY;
    use crate::storage::MemoryStore;
    use approx::assert_abs_diff_eq;

    fn tiananmen() -> SearchResult {
        SearchResult {
            name: "天安门".to_string(),
            address: "北京市东城区".to_string(),
            lat: 39.908692,
            lng: 116.397477,
            description: "北京地标".to_string(),
        }
    }

    fn create_test_app() -> (App<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        let app = App::new(History::load(store.clone()), TeleportTimings::default());
        (app, store)
    }

    #[test]
    fn test_teleport_records_history() {
        let (mut app, store) = create_test_app();
        app.select_result(tiananmen());
        app.teleport();
        assert!(app.history().is_empty());

        app.tick(Duration::from_millis(1200));

        assert_eq!(app.history().len(), 1);
        assert_eq!(app.state().history.len(), 1);
        let entry = &app.state().history[0];
        assert_eq!(entry.name, "天安门");
        assert_eq!(entry.address, "北京市东城区");
        assert!(store.get(HISTORY_KEY).unwrap().is_some());
    }

    #[test]
    fn test_teleport_without_selection_changes_nothing() {
        let (mut app, _) = create_test_app();
        app.teleport();
        app.tick(Duration::from_secs(10));
        assert!(app.history().is_empty());
        assert!(app.state().status.is_none());
        assert_eq!(app.next_deadline(), None);
    }

    #[test]
    fn test_next_deadline_follows_phase() {
        let (mut app, _) = create_test_app();
        app.select_result(tiananmen());
        app.teleport();
        assert_eq!(app.next_deadline(), Some(Duration::from_millis(1200)));
        app.tick(Duration::from_millis(1200));
        assert_eq!(app.next_deadline(), Some(Duration::from_millis(3000)));
        app.tick(Duration::from_millis(3000));
        assert_eq!(app.next_deadline(), None);
    }

    #[test]
    fn test_pick_wgs84_is_converted() {
        let (mut app, _) = create_test_app();
        let state = app
            .pick(Coordinates::new(31.1774276, 121.5272106), CoordinateSystem::Wgs84)
            .unwrap();
        assert_abs_diff_eq!(state.position.lat, 31.175303983645, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.lng, 121.531541859215, epsilon = 1e-9);
    }

    #[test]
    fn test_pick_rejects_invalid() {
        let (mut app, _) = create_test_app();
        assert!(app.pick(Coordinates::new(100.0, 0.0), CoordinateSystem::Gcj02).is_err());
        assert!(app.state().selected.is_none());
    }

    #[test]
    fn test_select_history() {
        let (mut app, _) = create_test_app();
        app.select_result(tiananmen());
        app.teleport();
        app.tick(Duration::from_secs(5));
        let id = app.state().history[0].id.clone();

        app.pick(Coordinates::new(31.23, 121.47), CoordinateSystem::Gcj02).unwrap();
        let state = app.select_history(&id).unwrap();
        assert_eq!(state.selected.as_ref().unwrap().name, "天安门");
        assert!(app.select_history("missing").is_none());
    }

    #[test]
    fn test_clear_history_removes_persisted() {
        let (mut app, store) = create_test_app();
        app.select_result(tiananmen());
        app.teleport();
        app.tick(Duration::from_secs(5));

        app.clear_history();

        assert!(app.state().history.is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
        assert!(History::load(store).is_empty());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.location.default_preset = "douyin".to_string();
        config.teleport.commit_delay_ms = 10;
        let app = App::from_config(&config, MemoryStore::new());

        assert_eq!(app.state().preset, Preset::Douyin);
        assert_eq!(app.timings().commit_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_from_config_loads_existing_history() {
        let store = MemoryStore::new();
        {
            let mut app = App::new(History::load(store.clone()), TeleportTimings::default());
            app.select_result(tiananmen());
            app.teleport();
            app.tick(Duration::from_secs(5));
        }

        let app = App::from_config(&Config::default(), store);
        assert_eq!(app.state().history.len(), 1);
    }
}
