//! User reviews of stations.
//!
//! Reviews live either in memory (development, tests) or in PostgreSQL.
//! Station ids are taken as given; nothing checks them against the
//! upstream list.

mod error;
mod memory;
mod postgres;
mod store;
mod types;

pub use error::ReviewError;
pub use memory::MemoryReviewStore;
pub use postgres::{PostgresReviewStore, SCHEMA};
pub use store::ReviewStore;
pub use types::{NewReview, Review, StationStats};
