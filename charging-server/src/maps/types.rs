//! Google Maps web service response types.
//!
//! Only the fields the service reads are modelled.

use serde::Deserialize;

/// Status every successful response carries.
pub const STATUS_OK: &str = "OK";

/// Directions status when the points are valid but unconnected.
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixRow {
    #[serde(default)]
    pub elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixElement {
    pub status: String,
    pub distance: Option<ValueField>,
    pub duration: Option<ValueField>,
}

/// `{"text": "...", "value": n}`; metres for distances, seconds for durations.
#[derive(Debug, Deserialize)]
pub struct ValueField {
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsLeg {
    #[serde(default)]
    pub steps: Vec<DirectionsStep>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsStep {
    pub start_location: LatLng,
    pub end_location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}
