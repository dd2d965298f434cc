//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::maps::{EstimateSource, TravelEstimate};
use crate::reviews::StationStats;

/// Default number of stations returned by a nearby search.
pub const DEFAULT_NEARBY_LIMIT: i64 = 10;

/// Query for stations around a point.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,

    /// How many stations to return; zero or negative returns none
    pub limit: Option<i64>,
}

/// Request for the travel distance between two points.
#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

/// Travel distance and time.
#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    /// Kilometres
    pub distance: f64,

    /// Seconds
    pub duration: i64,

    /// Whether the figures came from the map provider or the straight-line estimate
    pub source: EstimateSource,
}

impl From<TravelEstimate> for DistanceResponse {
    fn from(estimate: TravelEstimate) -> Self {
        Self {
            distance: estimate.distance_km,
            duration: estimate.duration_secs,
            source: estimate.source,
        }
    }
}

/// Request for a driving route.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
}

/// Reply to a successfully stored review.
#[derive(Debug, Serialize)]
pub struct CreateReviewResponse {
    /// Id of the new review
    pub id: i64,

    pub message: String,

    /// Station stats after the review, if they could be read back
    pub stats: Option<StationStats>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
