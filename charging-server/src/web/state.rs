//! Application state for the web layer.

use std::sync::Arc;

use crate::limiter::KeyedRateLimiter;
use crate::maps::MapService;
use crate::reviews::ReviewStore;
use crate::stations::StationService;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached station list
    pub stations: Arc<StationService>,

    /// Station reviews
    pub reviews: Arc<ReviewStore>,

    /// Distances and routes
    pub maps: Arc<MapService>,

    /// Per-client limiter for the distance and route endpoints
    pub limiter: Arc<KeyedRateLimiter>,

    /// Upper bound on the nearby search `limit`
    pub nearby_max_limit: usize,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        stations: StationService,
        reviews: ReviewStore,
        maps: MapService,
        limiter: KeyedRateLimiter,
        nearby_max_limit: usize,
    ) -> Self {
        Self {
            stations: Arc::new(stations),
            reviews: Arc::new(reviews),
            maps: Arc::new(maps),
            limiter: Arc::new(limiter),
            nearby_max_limit,
        }
    }
}
