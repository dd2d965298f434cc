//! Upstream station records.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::{Coordinate, Located};
use crate::serde_ext::null_as_default;

/// A charging station as published by the upstream provider.
///
/// Only `id`, `latitude` and `longitude` matter to the service; the rest is
/// passed through untouched. `average_rating` and `review_count` are filled
/// in locally when a single station is requested.
///
/// A `null` counter reads as zero. A `null` coordinate reads as NaN, so the
/// station has no usable position and is left out of nearby searches.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Station {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,

    #[serde(deserialize_with = "null_as_default")]
    pub station_id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub brand: String,

    #[serde(deserialize_with = "null_as_nan")]
    pub latitude: f64,

    #[serde(deserialize_with = "null_as_nan")]
    pub longitude: f64,

    #[serde(deserialize_with = "null_as_default")]
    pub connector_list: String,

    #[serde(deserialize_with = "null_as_default")]
    pub error_device_count: i64,

    #[serde(
        rename = "ac_available_sockets_count",
        deserialize_with = "null_as_default"
    )]
    pub ac_available_socket_count: i64,

    #[serde(
        rename = "dc_available_sockets_count",
        deserialize_with = "null_as_default"
    )]
    pub dc_available_socket_count: i64,

    #[serde(deserialize_with = "null_as_default")]
    pub unavailable_device_count: i64,

    #[serde(deserialize_with = "null_as_default")]
    pub total_connectors_count: i64,

    #[serde(deserialize_with = "null_as_default")]
    pub station_color: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
}

impl Located for Station {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }

    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.latitude, self.longitude).ok()
    }
}

/// Response envelope: `{"status", "message", "data": {"stations": [...]}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StationsEnvelope {
    status: Option<String>,
    message: Option<String>,
    data: StationsData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StationsData {
    stations: Vec<Station>,
}

/// Parse a station list, either wrapped in the upstream envelope or as a
/// bare JSON array.
pub fn parse_station_list(body: &str) -> Result<Vec<Station>, serde_json::Error> {
    if body.trim_start().starts_with('[') {
        return serde_json::from_str(body);
    }

    let envelope: StationsEnvelope = serde_json::from_str(body)?;
    if let Some(status) = envelope.status.as_deref() {
        tracing::debug!(
            status,
            message = envelope.message.as_deref().unwrap_or(""),
            "upstream envelope"
        );
    }
    Ok(envelope.data.stations)
}

fn null_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
