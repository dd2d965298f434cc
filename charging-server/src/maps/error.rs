//! Map provider error types.

use crate::geo::InvalidCoordinate;

/// Errors from the map provider.
#[derive(Debug, thiserror::Error)]
pub enum MapsError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-OK status
    #[error("map provider returned {status}{}", detail(.message))]
    Api {
        status: String,
        message: Option<String>,
    },

    /// No route exists between the two points
    #[error("no route found")]
    NoRoute,

    /// Provider returned a point outside the valid range
    #[error("provider returned an invalid point: {0}")]
    InvalidPoint(#[from] InvalidCoordinate),

    /// No API key configured
    #[error("map provider is not configured")]
    NotConfigured,
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}
