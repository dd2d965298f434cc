//! Travel distance, duration and routes.
//!
//! When a Google Maps API key is configured, driving distance and route
//! geometry come from its Distance Matrix and Directions services.
//! Without one (or when the provider fails) distances fall back to the
//! great-circle estimate from [`crate::geo`].

mod client;
mod error;
mod service;
mod types;

pub use client::{MapsClient, MapsConfig, ProviderLeg};
pub use error::MapsError;
pub use service::{EstimateSource, MapService, TravelEstimate};
