//! Upstream station list client.

use std::time::Duration;

use tracing::{debug, warn};

use super::error::StationError;
use super::types::{Station, parse_station_list};

/// Public fast-charging station feed.
pub const DEFAULT_STATIONS_URL: &str =
    "https://emsp-api.trugo.com.tr/v1/public/csms/stations/fast/";

/// Configuration for the station client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// Full URL of the station list endpoint
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StationClientConfig {
    /// Create a config for the given endpoint with a 30 second timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for StationClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STATIONS_URL)
    }
}

/// Client for the upstream station list.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    url: String,
}

impl StationClient {
    /// Create a new station client.
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Fetch the full station list.
    pub async fn fetch_all(&self) -> Result<Vec<Station>, StationError> {
        debug!(url = %self.url, "fetching station list");

        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StationError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        parse_station_list(&body).map_err(|e| {
            let excerpt: String = body.chars().take(500).collect();
            warn!(error = %e, body = %excerpt, "station list did not parse");
            StationError::Json {
                message: e.to_string(),
            }
        })
    }
}
