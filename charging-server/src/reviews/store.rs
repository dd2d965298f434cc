//! Review storage front end.

use tracing::info;

use super::error::ReviewError;
use super::memory::MemoryReviewStore;
use super::postgres::PostgresReviewStore;
use super::types::{NewReview, Review, StationStats};

/// Where reviews are kept.
///
/// Input validation happens here, so both backends see only well-formed
/// reviews.
#[derive(Debug)]
pub enum ReviewStore {
    Memory(MemoryReviewStore),
    Postgres(PostgresReviewStore),
}

impl ReviewStore {
    /// An empty in-memory store.
    pub fn in_memory() -> Self {
        ReviewStore::Memory(MemoryReviewStore::new())
    }

    /// Connect to PostgreSQL and make sure the schema exists.
    pub async fn postgres(url: &str) -> Result<Self, ReviewError> {
        let store = PostgresReviewStore::connect(url).await?;
        store.migrate().await?;
        info!("review schema ready");
        Ok(ReviewStore::Postgres(store))
    }

    /// Store a review for `station_id`.
    pub async fn create(&self, station_id: &str, review: NewReview) -> Result<Review, ReviewError> {
        if station_id.trim().is_empty() {
            return Err(ReviewError::MissingStationId);
        }
        review.validate()?;
        let review = review.normalized();

        let stored = match self {
            ReviewStore::Memory(store) => store.create(station_id, review).await,
            ReviewStore::Postgres(store) => store.create(station_id, review).await?,
        };
        info!(station_id, review_id = stored.id, rating = stored.rating, "review created");
        Ok(stored)
    }

    /// Reviews for `station_id`, newest first.
    pub async fn list(&self, station_id: &str) -> Result<Vec<Review>, ReviewError> {
        match self {
            ReviewStore::Memory(store) => Ok(store.list(station_id).await),
            ReviewStore::Postgres(store) => store.list(station_id).await,
        }
    }

    /// Average rating and review count for `station_id`.
    pub async fn stats(&self, station_id: &str) -> Result<StationStats, ReviewError> {
        match self {
            ReviewStore::Memory(store) => Ok(store.stats(station_id).await),
            ReviewStore::Postgres(store) => store.stats(station_id).await,
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> &'static str {
        match self {
            ReviewStore::Memory(_) => "memory",
            ReviewStore::Postgres(_) => "postgres",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_review(rating: f64) -> NewReview {
        NewReview {
            rating,
            comment: "ok".to_string(),
        }
    }

    #[tokio::test]
    async fn rejects_blank_station_id() {
        let store = ReviewStore::in_memory();
        let err = store.create("  ", new_review(3.0)).await.unwrap_err();
        assert!(matches!(err, ReviewError::MissingStationId));
    }

    #[tokio::test]
    async fn rejects_out_of_range_rating() {
        let store = ReviewStore::in_memory();
        let err = store.create("1", new_review(6.0)).await.unwrap_err();
        assert!(matches!(err, ReviewError::InvalidRating(r) if r == 6.0));

        assert!(store.list("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_stats() {
        let store = ReviewStore::in_memory();
        store.create("1", new_review(2.0)).await.unwrap();
        store.create("1", new_review(3.0)).await.unwrap();

        let stats = store.stats("1").await.unwrap();
        assert_eq!(stats.review_count, 2);
        assert_eq!(stats.average_rating, 2.5);
        assert_eq!(store.describe(), "memory");
    }

    #[tokio::test]
    async fn stores_rating_to_one_decimal() {
        let store = ReviewStore::in_memory();
        let stored = store.create("1", new_review(4.25)).await.unwrap();
        assert_eq!(stored.rating, 4.3);

        let listed = store.list("1").await.unwrap();
        assert_eq!(listed[0].rating, 4.3);
    }

    /// Runs against a real database when `TEST_POSTGRES_URI` is set.
    #[tokio::test]
    async fn postgres_round_trip() {
        let Ok(url) = std::env::var("TEST_POSTGRES_URI") else {
            return;
        };
        let store = ReviewStore::postgres(&url).await.unwrap();
        assert_eq!(store.describe(), "postgres");

        let station = format!("test-{}", std::process::id());
        let first = store.create(&station, new_review(4.25)).await.unwrap();
        assert_eq!(first.rating, 4.3);
        store.create(&station, new_review(2.0)).await.unwrap();
        store.create(&station, new_review(5.0)).await.unwrap();

        let listed = store.list(&station).await.unwrap();
        let ratings: Vec<f64> = listed.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![5.0, 2.0, 4.3]);

        let stats = store.stats(&station).await.unwrap();
        assert_eq!(stats.review_count, 3);
        assert_eq!(stats.average_rating, 3.8);

        let empty = store.stats("no-such-station").await.unwrap();
        assert_eq!(empty, StationStats::default());
    }
}
