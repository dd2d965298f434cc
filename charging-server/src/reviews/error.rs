//! Review error types.

/// Errors from creating or reading reviews.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("station id is required")]
    MissingStationId,

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(f64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
