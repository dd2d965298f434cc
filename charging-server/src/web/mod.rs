//! Web layer for the charging station backend.
//!
//! JSON endpoints for station lookup, nearby search, reviews, distances and
//! routes. Distance and route requests are rate limited per client.

mod dto;
mod rate_limit;
mod routes;
mod state;

pub use dto::*;
pub use rate_limit::client_key;
pub use routes::{AppError, create_router};
pub use state::AppState;
