//! Great-circle distance and the straight-line travel-time estimate.

use super::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Speed assumed when no routing provider supplies a travel time.
pub const ASSUMED_SPEED_KMH: f64 = 60.0;

/// Great-circle distance between two coordinates in kilometres.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
/// The result is symmetric, zero for identical points, and never larger
/// than half the circumference (about 20015 km).
///
/// ```
/// use charging_server::geo::{Coordinate, distance};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(0.0, 1.0).unwrap();
/// assert!((distance(a, b) - 111.19).abs() < 0.01);
/// ```
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lng = (b.lng() - a.lng()).to_radians();

    // Clamped: rounding can push this a hair past 1 for antipodal points.
    let h = ((d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Travel time in whole seconds for `distance_km` at [`ASSUMED_SPEED_KMH`].
///
/// This is a fallback policy, not a measurement. It is only used when the
/// routing provider is unavailable or returns nothing usable.
pub fn estimate_travel_secs(distance_km: f64) -> i64 {
    (distance_km / ASSUMED_SPEED_KMH * 3600.0) as i64
}
