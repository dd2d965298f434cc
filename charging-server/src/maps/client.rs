//! Google Maps web service client.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::geo::Coordinate;

use super::error::MapsError;
use super::types::{
    DirectionsResponse, DistanceMatrixResponse, STATUS_OK, STATUS_ZERO_RESULTS,
};

/// Default base URL for the Google Maps web services.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Configuration for the maps client.
#[derive(Debug, Clone)]
pub struct MapsConfig {
    /// Google Maps API key
    pub api_key: String,
    /// Base URL for the API (overridable for testing)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MapsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Driving distance and time reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderLeg {
    pub distance_km: f64,
    pub duration_secs: i64,
}

/// Client for the Distance Matrix and Directions services.
#[derive(Debug, Clone)]
pub struct MapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MapsClient {
    /// Create a new maps client.
    pub fn new(config: MapsConfig) -> Result<Self, MapsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Driving distance and duration between two points.
    ///
    /// Returns `Ok(None)` when the request succeeded but the provider has no
    /// usable answer for this pair (for example, no road connection).
    pub async fn distance_matrix(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Option<ProviderLeg>, MapsError> {
        let resp: DistanceMatrixResponse = self
            .get_json(
                "distancematrix",
                &[
                    ("origins", origin.to_string()),
                    ("destinations", destination.to_string()),
                    ("mode", "driving".to_string()),
                ],
            )
            .await?;

        if resp.status != STATUS_OK {
            return Err(MapsError::Api {
                status: resp.status,
                message: resp.error_message,
            });
        }

        let Some(element) = resp.rows.first().and_then(|row| row.elements.first()) else {
            return Ok(None);
        };

        if element.status != STATUS_OK {
            debug!(status = %element.status, "distance matrix element not usable");
            return Ok(None);
        }

        Ok(match (&element.distance, &element.duration) {
            (Some(distance), Some(duration)) => Some(ProviderLeg {
                distance_km: distance.value as f64 / 1000.0,
                duration_secs: duration.value,
            }),
            _ => None,
        })
    }

    /// Driving route as the start and end point of every step, in order.
    pub async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, MapsError> {
        let resp: DirectionsResponse = self
            .get_json(
                "directions",
                &[
                    ("origin", origin.to_string()),
                    ("destination", destination.to_string()),
                    ("mode", "driving".to_string()),
                ],
            )
            .await?;

        if resp.status == STATUS_ZERO_RESULTS {
            return Err(MapsError::NoRoute);
        }
        if resp.status != STATUS_OK {
            return Err(MapsError::Api {
                status: resp.status,
                message: resp.error_message,
            });
        }

        let route = resp.routes.first().ok_or(MapsError::NoRoute)?;

        let mut points = Vec::new();
        for step in route.legs.iter().flat_map(|leg| &leg.steps) {
            points.push(Coordinate::new(step.start_location.lat, step.start_location.lng)?);
            points.push(Coordinate::new(step.end_location.lat, step.end_location.lng)?);
        }
        Ok(points)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &str,
        params: &[(&str, String)],
    ) -> Result<T, MapsError> {
        let url = format!("{}/{}/json", self.base_url, service);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
