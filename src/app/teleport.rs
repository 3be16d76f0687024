//! Teleport status lifecycle
//!
//! `Idle → Committing → Success → Idle`, advanced by explicit elapsed time so
//! the whole lifecycle can be driven without real delays.

use crate::config::TeleportConfig;
use crate::constants::text::{status_success, STATUS_COMMITTING};
use crate::constants::timing::{COMMIT_DELAY_MS, STATUS_DISPLAY_MS};
use crate::geo::SearchResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Phase durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleportTimings {
    /// Simulated engine latency before the commit
    pub commit_delay: Duration,
    /// How long the success status stays up
    pub status_display: Duration,
}

impl TeleportTimings {
    pub fn new(commit_delay: Duration, status_display: Duration) -> Self {
        Self {
            commit_delay,
            status_display,
        }
    }
}

impl Default for TeleportTimings {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(COMMIT_DELAY_MS),
            Duration::from_millis(STATUS_DISPLAY_MS),
        )
    }
}

impl From<&TeleportConfig> for TeleportTimings {
    fn from(config: &TeleportConfig) -> Self {
        Self::new(
            Duration::from_millis(config.commit_delay_ms),
            Duration::from_millis(config.status_display_ms),
        )
    }
}

/// Current phase of the teleport lifecycle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TeleportPhase {
    #[default]
    Idle,
    /// Waiting out the simulated engine latency
    Committing {
        target: SearchResult,
        #[serde(rename = "remaining_ms", with = "duration_ms")]
        remaining: Duration,
    },
    /// Committed; success status is showing
    Success {
        name: String,
        #[serde(rename = "remaining_ms", with = "duration_ms")]
        remaining: Duration,
    },
}

/// Something that happened while advancing
#[derive(Debug, Clone, PartialEq)]
pub enum TeleportEvent {
    /// The commit delay elapsed for this target
    Committed(SearchResult),
    /// The success status was dismissed
    Dismissed,
}

impl TeleportPhase {
    /// Begin committing `target`
    ///
    /// Returns `None` while a commit is already in flight. Starting from
    /// `Success` cancels the pending dismissal.
    pub fn start(&self, target: SearchResult, timings: TeleportTimings) -> Option<Self> {
        match self {
            Self::Committing { .. } => None,
            Self::Idle | Self::Success { .. } => Some(Self::Committing {
                target,
                remaining: timings.commit_delay,
            }),
        }
    }

    /// Advance by `elapsed`, carrying leftover time into later phases
    pub fn advance(self, elapsed: Duration, timings: TeleportTimings) -> (Self, Vec<TeleportEvent>) {
        let mut phase = self;
        let mut left = elapsed;
        let mut events = Vec::new();

        loop {
            phase = match phase {
                Self::Idle => return (Self::Idle, events),
                Self::Committing { target, remaining } => {
                    if left < remaining {
                        return (Self::Committing { target, remaining: remaining - left }, events);
                    }
                    left -= remaining;
                    let name = target.name.clone();
                    events.push(TeleportEvent::Committed(target));
                    Self::Success {
                        name,
                        remaining: timings.status_display,
                    }
                }
                Self::Success { name, remaining } => {
                    if left < remaining {
                        return (Self::Success { name, remaining: remaining - left }, events);
                    }
                    left -= remaining;
                    events.push(TeleportEvent::Dismissed);
                    Self::Idle
                }
            };
        }
    }

    /// Status notification for this phase
    pub fn status(&self) -> Option<String> {
        match self {
            Self::Idle => None,
            Self::Committing { .. } => Some(STATUS_COMMITTING.to_string()),
            Self::Success { name, .. } => Some(status_success(name)),
        }
    }

    /// Time until the next transition, if any
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Self::Idle => None,
            Self::Committing { remaining, .. } | Self::Success { remaining, .. } => Some(*remaining),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> SearchResult {
        SearchResult {
            name: "天安门".to_string(),
            address: "北京市东城区".to_string(),
            lat: 39.908692,
            lng: 116.397477,
            description: "北京地标".to_string(),
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_default_timings() {
        let timings = TeleportTimings::default();
        assert_eq!(timings.commit_delay, ms(1200));
        assert_eq!(timings.status_display, ms(3000));
    }

    #[test]
    fn test_full_lifecycle() {
        let timings = TeleportTimings::default();
        let phase = TeleportPhase::Idle.start(target(), timings).unwrap();
        assert_eq!(phase.status().unwrap(), "高德引擎正在重写 GPS 信号...");

        let (phase, events) = phase.advance(ms(1199), timings);
        assert!(events.is_empty());
        assert_eq!(phase.remaining(), Some(ms(1)));

        let (phase, events) = phase.advance(ms(1), timings);
        assert_eq!(events, vec![TeleportEvent::Committed(target())]);
        assert_eq!(phase.status().unwrap(), "[高德内核] 天安门 定位成功");
        assert_eq!(phase.remaining(), Some(ms(3000)));

        let (phase, events) = phase.advance(ms(3000), timings);
        assert_eq!(events, vec![TeleportEvent::Dismissed]);
        assert!(phase.is_idle());
        assert_eq!(phase.status(), None);
    }

    #[test]
    fn test_single_large_tick_runs_everything() {
        let timings = TeleportTimings::default();
        let phase = TeleportPhase::Idle.start(target(), timings).unwrap();
        let (phase, events) = phase.advance(ms(10_000), timings);
        assert!(phase.is_idle());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_leftover_time_carries_over() {
        let timings = TeleportTimings::default();
        let phase = TeleportPhase::Idle.start(target(), timings).unwrap();
        let (phase, _) = phase.advance(ms(1700), timings);
        assert_eq!(phase.remaining(), Some(ms(2500)));
    }

    #[test]
    fn test_start_while_committing_is_rejected() {
        let timings = TeleportTimings::default();
        let phase = TeleportPhase::Idle.start(target(), timings).unwrap();
        assert!(phase.start(target(), timings).is_none());
    }

    #[test]
    fn test_start_from_success_restarts() {
        let timings = TeleportTimings::default();
        let phase = TeleportPhase::Idle.start(target(), timings).unwrap();
        let (phase, _) = phase.advance(ms(1500), timings);
        assert!(matches!(phase, TeleportPhase::Success { .. }));

        let restarted = phase.start(target(), timings).unwrap();
        assert_eq!(restarted.remaining(), Some(ms(1200)));
    }

    #[test]
    fn test_idle_advance_is_noop() {
        let (phase, events) = TeleportPhase::Idle.advance(ms(500), TeleportTimings::default());
        assert!(phase.is_idle());
        assert!(events.is_empty());
    }

    #[test]
    fn test_phase_serialization() {
        let timings = TeleportTimings::default();
        let phase = TeleportPhase::Idle.start(target(), timings).unwrap();
        let value = serde_json::to_value(&phase).unwrap();
        assert_eq!(value["phase"], "committing");
        assert_eq!(value["remaining_ms"], 1200);

        let parsed: TeleportPhase = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, phase);
    }
}
