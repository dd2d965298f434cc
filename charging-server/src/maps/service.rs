//! Distance and route queries with a straight-line fallback.

use serde::Serialize;
use tracing::{debug, warn};

use crate::geo::{self, Coordinate};

use super::client::MapsClient;
use super::error::MapsError;

/// Where a travel estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    /// Driving distance and time from the map provider.
    Provider,

    /// Great-circle distance at an assumed 60 km/h. Not a measurement.
    Estimate,
}

/// Distance in kilometres and travel time in seconds between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TravelEstimate {
    pub distance_km: f64,
    pub duration_secs: i64,
    pub source: EstimateSource,
}

impl TravelEstimate {
    /// The great-circle fallback.
    pub fn straight_line(origin: Coordinate, destination: Coordinate) -> Self {
        let distance_km = geo::distance(origin, destination);
        Self {
            distance_km,
            duration_secs: geo::estimate_travel_secs(distance_km),
            source: EstimateSource::Estimate,
        }
    }
}

/// Front end to the map provider.
pub struct MapService {
    client: Option<MapsClient>,
}

impl MapService {
    /// `None` runs without a provider: distances are always estimates and
    /// routes are unavailable.
    pub fn new(client: Option<MapsClient>) -> Self {
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Travel distance and time, from the provider when it can answer.
    ///
    /// Never fails: any provider problem is logged and the straight-line
    /// estimate is returned instead.
    pub async fn distance(&self, origin: Coordinate, destination: Coordinate) -> TravelEstimate {
        let fallback = TravelEstimate::straight_line(origin, destination);

        let Some(client) = &self.client else {
            return fallback;
        };

        match client.distance_matrix(origin, destination).await {
            Ok(Some(leg)) => TravelEstimate {
                distance_km: leg.distance_km,
                duration_secs: leg.duration_secs,
                source: EstimateSource::Provider,
            },
            Ok(None) => {
                debug!(%origin, %destination, "no provider distance; using straight-line estimate");
                fallback
            }
            Err(e) => {
                warn!(error = %e, "distance provider failed; using straight-line estimate");
                fallback
            }
        }
    }

    /// Driving route between two points. Requires a provider.
    pub async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, MapsError> {
        let client = self.client.as_ref().ok_or(MapsError::NotConfigured)?;
        client.directions(origin, destination).await
    }
}
