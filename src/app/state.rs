//! Application state and reducer
//!
//! `AppState::reduce` is pure: it consumes the state and an [`Action`] and
//! returns the next state plus at most one [`Effect`] for the caller to apply
//! against the history store.

use crate::app::teleport::{TeleportEvent, TeleportPhase, TeleportTimings};
use crate::constants::geo::{INITIAL_LAT, INITIAL_LNG};
use crate::coord::Coordinates;
use crate::geo::SearchResult;
use crate::history::Location;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Target app the simulated position is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Dingtalk,
    Wechat,
    Douyin,
    Generic,
}

impl Preset {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dingtalk => "钉钉",
            Self::Wechat => "微信",
            Self::Douyin => "抖音",
            Self::Generic => "系统全局",
        }
    }

    pub fn all() -> [Preset; 4] {
        [Self::Dingtalk, Self::Wechat, Self::Douyin, Self::Generic]
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .into_iter()
            .find(|p| p.label() == s || serde_name(p) == lower)
            .ok_or_else(|| format!("Unknown preset: {}", s))
    }
}

fn serde_name(preset: &Preset) -> &'static str {
    match preset {
        Preset::Dingtalk => "dingtalk",
        Preset::Wechat => "wechat",
        Preset::Douyin => "douyin",
        Preset::Generic => "generic",
    }
}

/// Map view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::TwoD => Self::ThreeD,
            Self::ThreeD => Self::TwoD,
        }
    }
}

/// Map tile style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    #[default]
    Normal,
    Satellite,
}

impl MapStyle {
    pub fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Satellite,
            Self::Satellite => Self::Normal,
        }
    }
}

/// Everything the presentation shell renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub preset: Preset,
    /// Current simulated position (GCJ-02)
    pub position: Coordinates,
    pub selected: Option<SearchResult>,
    /// Candidates from the latest search response
    pub results: Vec<SearchResult>,
    pub view_mode: ViewMode,
    pub map_style: MapStyle,
    pub teleport: TeleportPhase,
    /// Status notification text, if one is showing
    pub status: Option<String>,
    /// Snapshot of the history store
    pub history: Vec<Location>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            position: Coordinates::new(INITIAL_LAT, INITIAL_LNG),
            selected: None,
            results: Vec::new(),
            view_mode: ViewMode::default(),
            map_style: MapStyle::default(),
            teleport: TeleportPhase::Idle,
            status: None,
            history: Vec::new(),
        }
    }
}

/// User and timer events
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A search response arrived (last one wins)
    SearchCompleted(Vec<SearchResult>),
    Select(SearchResult),
    /// Select a history entry by id
    SelectHistory(String),
    /// Direct map click, already GCJ-02
    Pick(Coordinates),
    /// Confirm the current selection
    Teleport,
    /// Virtual time passed
    Tick(Duration),
    ClearHistory,
    SetPreset(Preset),
    ToggleViewMode,
    ToggleMapStyle,
}

/// Side effects for the history store
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Record a teleport to this candidate
    Commit(SearchResult),
    /// Remove all history
    ClearHistory,
}

impl AppState {
    /// Apply an action
    pub fn reduce(mut self, action: Action, timings: TeleportTimings) -> (Self, Option<Effect>) {
        let mut effect = None;

        match action {
            Action::SearchCompleted(results) => self.results = results,
            Action::Select(result) => self.select(result),
            Action::SelectHistory(id) => {
                if let Some(result) = self.history.iter().find(|l| l.id == id).map(Location::to_result) {
                    self.select(result);
                }
            }
            Action::Pick(coords) => self.select(SearchResult::from_map_click(coords)),
            Action::Teleport => {
                if let Some(target) = self.selected.clone() {
                    if let Some(next) = self.teleport.start(target, timings) {
                        self.teleport = next;
                    }
                }
            }
            Action::Tick(elapsed) => {
                let (next, events) = std::mem::take(&mut self.teleport).advance(elapsed, timings);
                self.teleport = next;
                effect = events.into_iter().find_map(|event| match event {
                    TeleportEvent::Committed(target) => Some(Effect::Commit(target)),
                    TeleportEvent::Dismissed => None,
                });
            }
            Action::ClearHistory => {
                self.history.clear();
                effect = Some(Effect::ClearHistory);
            }
            Action::SetPreset(preset) => self.preset = preset,
            Action::ToggleViewMode => self.view_mode = self.view_mode.toggled(),
            Action::ToggleMapStyle => self.map_style = self.map_style.toggled(),
        }

        self.status = self.teleport.status();
        (self, effect)
    }

    fn select(&mut self, result: SearchResult) {
        self.position = result.coords();
        self.selected = Some(result);
    }
}
