//! Geographic coordinate module
//!
//! Provides the [`Coordinate`] type and the great-circle distance function
//! used to decide whether two position samples represent the same place.

mod types;

pub use types::{Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters (IUGG value).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Computes the great-circle distance between two coordinates in meters.
///
/// Uses the haversine formula, which is numerically stable for the short
/// distances this crate cares about (tens of meters between consecutive
/// fixes).
///
/// The function is symmetric: `distance_meters(a, b) == distance_meters(b, a)`.
/// NaN inputs propagate as NaN; validation is the caller's responsibility
/// (see [`Coordinate::is_valid`]).
///
/// # Example
///
/// ```
/// use waypost::coord::{distance_meters, Coordinate};
///
/// let a = Coordinate::new(53.630278, 9.988333);
/// let b = Coordinate::new(53.630278, 9.988333);
/// assert_eq!(distance_meters(a, b), 0.0);
/// ```
#[inline]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_identical_points() {
        let p = Coordinate::new(40.7128, -74.0060);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(53.630278, 9.988333);
        let b = Coordinate::new(53.631, 9.989);
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }

    #[test]
    fn test_hamburg_to_toulouse() {
        // Hamburg airport to Toulouse airport, roughly 1240 km.
        let hamburg = Coordinate::new(53.630278, 9.988333);
        let toulouse = Coordinate::new(43.629444, 1.363889);
        let d = distance_meters(hamburg, toulouse);
        assert!((1_230_000.0..1_250_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_short_distance_near_equator() {
        // 0.0001 degrees of latitude is about 11.1 meters everywhere.
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0001, 0.0);
        let d = distance_meters(a, b);
        assert!((10.5..11.7).contains(&d), "got {d}");
    }

    #[test]
    fn test_short_distance_at_high_latitude() {
        let a = Coordinate::new(60.0, 10.0);
        let b = Coordinate::new(60.0001, 10.0);
        let d = distance_meters(a, b);
        assert!((10.5..11.7).contains(&d), "got {d}");
    }

    #[test]
    fn test_nan_propagates() {
        let a = Coordinate::new(f64::NAN, 0.0);
        let b = Coordinate::new(0.0, 0.0);
        assert!(distance_meters(a, b).is_nan());
    }

    #[test]
    fn test_monotonic_with_separation() {
        let origin = Coordinate::new(48.8566, 2.3522);
        let near = Coordinate::new(48.8567, 2.3522);
        let far = Coordinate::new(48.8580, 2.3522);
        assert!(distance_meters(origin, near) < distance_meters(origin, far));
    }
}
