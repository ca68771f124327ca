//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create a coordinate pair from degrees.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two points in kilometres (haversine).
///
/// Pure function with no error cases: malformed input (NaN, out-of-range
/// degrees) produces NaN and is propagated, not caught.
#[must_use]
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = Coordinates::new(52.52, 13.405);
        assert!(distance_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree of latitude is ~111.19 km on a 6371 km sphere.
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.05, "got {d}");
    }

    #[test]
    fn test_berlin_to_munich() {
        // Berlin (52.5200, 13.4050) to Munich (48.1351, 11.5820) is ~504 km.
        let d = distance_km(
            Coordinates::new(52.5200, 13.4050),
            Coordinates::new(48.1351, 11.5820),
        );
        assert!((d - 504.0).abs() < 2.0, "got {d}");
    }

    #[test]
    fn test_symmetry() {
        let a = Coordinates::new(48.2082, 16.3738);
        let b = Coordinates::new(50.1109, 8.6821);
        let ab = distance_km(a, b);
        let ba = distance_km(b, a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_nan_propagates() {
        let d = distance_km(Coordinates::new(f64::NAN, 0.0), Coordinates::new(0.0, 0.0));
        assert!(d.is_nan());
    }
}
