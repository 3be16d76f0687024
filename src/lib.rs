//! smartloc: AI-assisted place search and simulated GPS teleport
//!
//! A library and CLI tool that resolves place names to GCJ-02 coordinates
//! through a generative-AI provider, lets the user pick a candidate (or a map
//! point), and "teleports" a simulated location with a timed status
//! lifecycle and a deduplicated history.
//!
//! ## Features
//!
//! - Gemini-backed geocoding with structured JSON output
//! - GCJ-02 / WGS-84 coordinate handling
//! - Pure state reducer with an explicit teleport state machine
//! - Bounded, name-deduplicated history over a key/value store
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use smartloc::app::teleport::TeleportTimings;
//! use smartloc::app::App;
//! use smartloc::coord::{CoordinateSystem, Coordinates};
//! use smartloc::history::History;
//! use smartloc::storage::MemoryStore;
//! use std::time::Duration;
//!
//! let mut app = App::new(History::load(MemoryStore::new()), TeleportTimings::default());
//!
//! // A map click becomes the selected candidate
//! app.pick(Coordinates::new(31.23, 121.47), CoordinateSystem::Gcj02).unwrap();
//!
//! // Teleport, then let the simulated engine finish
//! app.teleport();
//! app.tick(Duration::from_millis(1200));
//!
//! assert_eq!(app.history().entries()[0].name, "自定义坐标点");
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod geo;
pub mod history;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use app::App;
pub use config::Config;
pub use coord::{CoordinateSystem, Coordinates};
pub use error::{Error, Result};
pub use geo::{GeocodeProvider, SearchResult};
pub use history::{History, Location};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
