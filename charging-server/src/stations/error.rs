//! Station provider error types.

/// Errors that can occur while loading the station list.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream rejected our credentials
    #[error("unauthorized by station provider")]
    Unauthorized,

    /// Upstream returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the station list
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Failed to read a local station file
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}
