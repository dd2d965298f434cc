//! Charging station list from the upstream provider.
//!
//! The provider publishes the complete list at a single endpoint. It is
//! fetched on demand, kept briefly in memory, and searched locally.

mod client;
mod error;
mod service;
mod source;
mod types;

pub use client::{DEFAULT_STATIONS_URL, StationClient, StationClientConfig};
pub use error::StationError;
pub use service::{DEFAULT_CACHE_TTL, StationService};
pub use source::StationSource;
pub use types::{Station, parse_station_list};
