//! Geo-distance engine.
//!
//! Great-circle distance between two points on the Earth's surface, and
//! nearest-N selection over anything that has a location. Everything in
//! here is pure: no shared state, no I/O, safe to call from any task.

mod coordinate;
mod distance;
mod nearest;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use distance::{ASSUMED_SPEED_KMH, EARTH_RADIUS_KM, distance, estimate_travel_secs};
pub use nearest::{Located, nearest, nearest_with_distance};
