//! PostgreSQL review store.

use sqlx::PgPool;

use super::error::ReviewError;
use super::types::{NewReview, Review, StationStats};

/// Table and indexes for reviews. Safe to run on every start.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    id BIGSERIAL PRIMARY KEY,
    station_id VARCHAR(255) NOT NULL,
    rating DOUBLE PRECISION NOT NULL CHECK (rating >= 1 AND rating <= 5),
    comment TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_reviews_station_id ON reviews (station_id);
CREATE INDEX IF NOT EXISTS idx_reviews_created_at ON reviews (created_at DESC);
"#;

/// Reviews stored in PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresReviewStore {
    pool: PgPool,
}

impl PostgresReviewStore {
    /// Connect to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self, ReviewError> {
        let pool = PgPool::connect(url).await?;
        Ok(Self { pool })
    }

    /// Create the reviews table if it does not exist.
    pub async fn migrate(&self) -> Result<(), ReviewError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn create(&self, station_id: &str, review: NewReview) -> Result<Review, ReviewError> {
        let stored = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (station_id, rating, comment)
             VALUES ($1, $2, $3)
             RETURNING id, station_id, rating, comment, created_at, updated_at",
        )
        .bind(station_id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    /// Reviews for a station, newest first.
    pub async fn list(&self, station_id: &str) -> Result<Vec<Review>, ReviewError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, station_id, rating, comment, created_at, updated_at
             FROM reviews
             WHERE station_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(station_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn stats(&self, station_id: &str) -> Result<StationStats, ReviewError> {
        let (average_rating, review_count): (f64, i64) = sqlx::query_as(
            "SELECT COALESCE(ROUND(AVG(rating)::numeric, 1), 0)::float8,
                    COUNT(*)
             FROM reviews
             WHERE station_id = $1",
        )
        .bind(station_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(StationStats {
            average_rating,
            review_count,
        })
    }
}
