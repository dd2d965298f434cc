//! Review records and aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde_ext::null_as_default;

use super::error::ReviewError;

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 1.0;

/// Highest accepted rating.
pub const MAX_RATING: f64 = 5.0;

/// A stored review.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub station_id: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for a new review.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub rating: f64,

    /// Missing or `null` is stored as an empty comment
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
}

impl NewReview {
    /// Check the rating is a finite number in `[1, 5]`.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if (MIN_RATING..=MAX_RATING).contains(&self.rating) {
            Ok(())
        } else {
            Err(ReviewError::InvalidRating(self.rating))
        }
    }

    /// The review as it is stored: rating rounded to one decimal place.
    pub fn normalized(self) -> Self {
        Self {
            rating: round_one_decimal(self.rating),
            ..self
        }
    }
}

/// Rating summary for one station.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StationStats {
    /// Mean rating to one decimal place, 0 when there are no reviews
    pub average_rating: f64,
    pub review_count: i64,
}

impl StationStats {
    /// Summarise a set of ratings.
    pub fn from_ratings(ratings: impl IntoIterator<Item = f64>) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0.0, 0i64), |(sum, count), r| (sum + r, count + 1));

        if count == 0 {
            return Self::default();
        }

        Self {
            average_rating: round_one_decimal(sum / count as f64),
            review_count: count,
        }
    }
}

fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
