//! WGS-84 to GCJ-02 conversion
//!
//! GCJ-02 applies a deterministic, non-linear offset to WGS-84 coordinates
//! inside mainland China. Outside that region the two systems coincide.

use crate::constants::geo::{KRASOVSKY_A, KRASOVSKY_EE};
use crate::coord::Coordinates;
use std::f64::consts::PI;

/// Rough bounding box of mainland China
///
/// Points outside it are not offset.
pub fn out_of_china(coords: Coordinates) -> bool {
    coords.lng < 72.004 || coords.lng > 137.8347 || coords.lat < 0.8293 || coords.lat > 55.8271
}

/// Convert a WGS-84 pair to GCJ-02
pub fn wgs84_to_gcj02(coords: Coordinates) -> Coordinates {
    if out_of_china(coords) {
        return coords;
    }
    let (dlat, dlng) = offset(coords);
    Coordinates::new(coords.lat + dlat, coords.lng + dlng)
}

/// Approximate GCJ-02 to WGS-84 inverse
///
/// Subtracts the offset evaluated at the GCJ-02 point. Accurate to a few
/// meters, which is enough for display.
pub fn gcj02_to_wgs84(coords: Coordinates) -> Coordinates {
    if out_of_china(coords) {
        return coords;
    }
    let (dlat, dlng) = offset(coords);
    Coordinates::new(coords.lat - dlat, coords.lng - dlng)
}

/// Offset in degrees (lat, lng) at a point
fn offset(coords: Coordinates) -> (f64, f64) {
    let x = coords.lng - 105.0;
    let y = coords.lat - 35.0;
    let dlat = transform_lat(x, y);
    let dlng = transform_lng(x, y);

    let rad_lat = coords.lat / 180.0 * PI;
    let magic = 1.0 - KRASOVSKY_EE * rad_lat.sin().powi(2);
    let sqrt_magic = magic.sqrt();

    let dlat = (dlat * 180.0) / ((KRASOVSKY_A * (1.0 - KRASOVSKY_EE)) / (magic * sqrt_magic) * PI);
    let dlng = (dlng * 180.0) / (KRASOVSKY_A / sqrt_magic * rad_lat.cos() * PI);
    (dlat, dlng)
}

fn transform_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn transform_lng(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_known_shanghai_offset() {
        let gcj = wgs84_to_gcj02(Coordinates::new(31.1774276, 121.5272106));
        assert_abs_diff_eq!(gcj.lat, 31.175303983645, epsilon = 1e-9);
        assert_abs_diff_eq!(gcj.lng, 121.531541859215, epsilon = 1e-9);
    }

    #[test]
    fn test_beijing_offset_magnitude() {
        let wgs = Coordinates::new(39.9073, 116.3912);
        let gcj = wgs84_to_gcj02(wgs);
        // Offset in Beijing is a few hundred meters
        assert!(gcj.lat - wgs.lat > 0.0 && gcj.lat - wgs.lat < 0.003);
        assert!(gcj.lng - wgs.lng > 0.004 && gcj.lng - wgs.lng < 0.008);
    }

    #[test]
    fn test_outside_china_unchanged() {
        let nyc = Coordinates::new(40.7128, -74.0060);
        assert!(out_of_china(nyc));
        assert_eq!(wgs84_to_gcj02(nyc), nyc);
        assert_eq!(gcj02_to_wgs84(nyc), nyc);
    }

    #[test]
    fn test_inverse_is_close() {
        let wgs = Coordinates::new(39.9073, 116.3912);
        let back = gcj02_to_wgs84(wgs84_to_gcj02(wgs));
        assert_abs_diff_eq!(back.lat, wgs.lat, epsilon = 1e-4);
        assert_abs_diff_eq!(back.lng, wgs.lng, epsilon = 1e-4);
    }
}
