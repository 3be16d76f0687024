//! Coordinate types
//!
//! Every coordinate pair that flows through smartloc is GCJ-02, the offset
//! system required by AMap inside mainland China. Pairs from other sources
//! are tagged with a [`CoordinateSystem`] and normalised on entry.

pub mod gcj02;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A GCJ-02 coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Whether the pair passes [`validate`](Self::validate)
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Format as "lat, lng" with 5 decimal places
    pub fn label(&self) -> String {
        format!("{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Coordinate system of an incoming pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    /// Already GCJ-02 (map widget clicks, AMap, the geocoding provider)
    #[default]
    Gcj02,
    /// Raw GPS / WGS-84
    Wgs84,
}

impl CoordinateSystem {
    /// Convert a pair expressed in this system into GCJ-02
    pub fn to_gcj02(self, coords: Coordinates) -> Coordinates {
        match self {
            Self::Gcj02 => coords,
            Self::Wgs84 => gcj02::wgs84_to_gcj02(coords),
        }
    }
}

impl std::str::FromStr for CoordinateSystem {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcj02" | "gcj-02" | "gcj" => Ok(Self::Gcj02),
            "wgs84" | "wgs-84" | "wgs" | "gps" => Ok(Self::Wgs84),
            _ => Err(format!("Unknown coordinate system: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate() {
        assert!(Coordinates::new(39.908692, 116.397477).validate().is_ok());
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -181.0).validate().is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
        assert!(!Coordinates::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_label_uses_five_decimals() {
        assert_eq!(Coordinates::new(31.23, 121.47).label(), "31.23000, 121.47000");
        assert_eq!(
            Coordinates::new(39.9086921, -116.3974771).label(),
            "39.90869, -116.39748"
        );
    }

    #[test]
    fn test_coordinate_system_from_str() {
        assert_eq!(CoordinateSystem::from_str("GCJ-02").unwrap(), CoordinateSystem::Gcj02);
        assert_eq!(CoordinateSystem::from_str("wgs84").unwrap(), CoordinateSystem::Wgs84);
        assert!(CoordinateSystem::from_str("bd09").is_err());
    }

    #[test]
    fn test_gcj02_passthrough() {
        let coords = Coordinates::new(31.23, 121.47);
        assert_eq!(CoordinateSystem::Gcj02.to_gcj02(coords), coords);
    }
}
