//! Geocoding module
//!
//! Resolves free-text place references to GCJ-02 candidates through a
//! generative-AI completion provider.

pub mod gemini;
pub mod search;

use crate::config::Config;
use crate::constants::text::CUSTOM_POINT_NAME;
use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A candidate location produced by a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Place name, e.g. "天安门"
    pub name: String,
    /// Street or district address
    pub address: String,
    /// Latitude (GCJ-02)
    pub lat: f64,
    /// Longitude (GCJ-02)
    pub lng: f64,
    /// Short description; empty for map clicks and history selections
    #[serde(default)]
    pub description: String,
}

impl SearchResult {
    /// Coordinates of this candidate
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Candidate for a direct map click
    pub fn from_map_click(coords: Coordinates) -> Self {
        Self {
            name: CUSTOM_POINT_NAME.to_string(),
            address: coords.label(),
            lat: coords.lat,
            lng: coords.lng,
            description: String::new(),
        }
    }

    /// Whether every schema field is present and usable
    ///
    /// Text fields must be non-blank and the pair must be a valid coordinate.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.address.trim().is_empty()
            && !self.description.trim().is_empty()
            && self.coords().is_valid()
    }
}

/// Trait for geocoding providers
pub trait GeocodeProvider: Send + Sync {
    /// Short provider name for logs and status output
    fn name(&self) -> &str;

    /// Resolve a query to raw candidates
    ///
    /// Implementations report transport and parse problems as errors; the
    /// [`search::SearchOrchestrator`] decides how to absorb them.
    fn geocode(&self, query: &str) -> impl std::future::Future<Output = Result<Vec<SearchResult>>> + Send;
}

/// Get the default geocoding provider from config
pub fn get_geocoder(config: &Config) -> Result<gemini::GeminiClient> {
    gemini::GeminiClient::from_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiananmen() -> SearchResult {
        SearchResult {
            name: "天安门".to_string(),
            address: "北京市东城区".to_string(),
            lat: 39.908692,
            lng: 116.397477,
            description: "北京地标".to_string(),
        }
    }

    #[test]
    fn test_well_formed() {
        assert!(tiananmen().is_well_formed());
    }

    #[test]
    fn test_blank_fields_are_not_well_formed() {
        let mut r = tiananmen();
        r.description = "  ".to_string();
        assert!(!r.is_well_formed());

        let mut r = tiananmen();
        r.name = String::new();
        assert!(!r.is_well_formed());

        let mut r = tiananmen();
        r.lat = 120.0;
        assert!(!r.is_well_formed());
    }

    #[test]
    fn test_map_click_candidate() {
        let r = SearchResult::from_map_click(Coordinates::new(31.23, 121.47));
        assert_eq!(r.name, "自定义坐标点");
        assert_eq!(r.address, "31.23000, 121.47000");
        assert_eq!(r.description, "");
        assert_eq!(r.coords(), Coordinates::new(31.23, 121.47));
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let json = r#"{"name":"外滩","address":"上海市黄浦区","lat":31.23,"lng":121.49}"#;
        let parsed: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.description, "");
        assert!(!parsed.is_well_formed());
    }
}
