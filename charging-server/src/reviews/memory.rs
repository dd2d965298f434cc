//! In-process review store.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::types::{NewReview, Review, StationStats};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    by_station: HashMap<String, Vec<Review>>,
}

/// Reviews held in memory; lost on restart.
#[derive(Debug, Default)]
pub struct MemoryReviewStore {
    inner: RwLock<Inner>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, station_id: &str, review: NewReview) -> Review {
        let mut guard = self.inner.write().await;
        guard.next_id += 1;

        let now = Utc::now();
        let stored = Review {
            id: guard.next_id,
            station_id: station_id.to_string(),
            rating: review.rating,
            comment: review.comment,
            created_at: now,
            updated_at: now,
        };

        guard
            .by_station
            .entry(station_id.to_string())
            .or_default()
            .push(stored.clone());

        stored
    }

    /// Reviews for a station, newest first.
    pub async fn list(&self, station_id: &str) -> Vec<Review> {
        let guard = self.inner.read().await;
        guard
            .by_station
            .get(station_id)
            .map(|reviews| reviews.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn stats(&self, station_id: &str) -> StationStats {
        let guard = self.inner.read().await;
        let ratings = guard
            .by_station
            .get(station_id)
            .into_iter()
            .flatten()
            .map(|r| r.rating);
        StationStats::from_ratings(ratings)
    }
}
