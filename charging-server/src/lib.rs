//! Charging station backend.
//!
//! Serves the upstream station list with nearest-station search, station
//! reviews, and rate-limited distance and route queries.

pub mod config;
pub mod geo;
pub mod limiter;
pub mod maps;
pub mod reviews;
pub mod stations;
pub mod web;

mod serde_ext;
