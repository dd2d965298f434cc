//! HTTP route handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::geo::{Coordinate, InvalidCoordinate};
use crate::maps::MapsError;
use crate::reviews::{NewReview, Review, ReviewError};
use crate::stations::{Station, StationError};

use super::dto::*;
use super::rate_limit::rate_limit;
use super::state::AppState;

/// How long browsers may cache a CORS preflight.
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let limited = Router::new()
        .route("/api/stations/distance", post(distance))
        .route("/api/stations/route", post(route))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/nearby", get(nearby_stations))
        .route("/api/stations/:id", get(station_details))
        .route(
            "/api/stations/:id/reviews",
            get(list_reviews).post(create_review),
        )
        .merge(limited)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every station, as the provider lists them.
async fn list_stations(
    State(state): State<AppState>,
) -> Result<Json<Arc<Vec<Station>>>, AppError> {
    Ok(Json(state.stations.all().await?))
}

/// Stations nearest to a point.
async fn nearby_stations(
    State(state): State<AppState>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> Result<Json<Vec<Station>>, AppError> {
    let Query(req) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    let origin = Coordinate::new(req.lat, req.lng)?;

    // Negative limits select nothing
    let limit = usize::try_from(req.limit.unwrap_or(DEFAULT_NEARBY_LIMIT))
        .unwrap_or(0)
        .min(state.nearby_max_limit);

    Ok(Json(state.stations.nearby(origin, limit).await?))
}

/// One station with its rating summary.
async fn station_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Station>, AppError> {
    let (station, stats) = futures::join!(state.stations.get(&id), state.reviews.stats(&id));

    let mut station = station?.ok_or_else(|| AppError::NotFound {
        message: format!("Station not found: {id}"),
    })?;

    let stats = stats.unwrap_or_else(|e| {
        warn!(station = %id, error = %e, "could not read review stats");
        Default::default()
    });
    station.average_rating = Some(stats.average_rating);
    station.review_count = Some(stats.review_count);

    Ok(Json(station))
}

/// Travel distance and time between two points.
async fn distance(
    State(state): State<AppState>,
    body: Result<Json<DistanceRequest>, JsonRejection>,
) -> Result<Json<DistanceResponse>, AppError> {
    let Json(req) = body?;

    let origin = Coordinate::new(req.lat1, req.lon1)?;
    let destination = Coordinate::new(req.lat2, req.lon2)?;

    let estimate = state.maps.distance(origin, destination).await;
    Ok(Json(estimate.into()))
}

/// Driving route between two points as a list of coordinates.
async fn route(
    State(state): State<AppState>,
    body: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<Vec<Coordinate>>, AppError> {
    let Json(req) = body?;

    let origin = Coordinate::new(req.origin_lat, req.origin_lng)?;
    let destination = Coordinate::new(req.destination_lat, req.destination_lng)?;

    Ok(Json(state.maps.route(origin, destination).await?))
}

/// Reviews for a station, newest first.
async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.reviews.list(&id).await?))
}

/// Store a review and report the station's updated stats.
async fn create_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<NewReview>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateReviewResponse>), AppError> {
    let Json(new_review) = body?;

    let review = state.reviews.create(&id, new_review).await?;

    let stats = match state.reviews.stats(&id).await {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!(station = %id, error = %e, "review stored but stats unavailable");
            None
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateReviewResponse {
            id: review.id,
            message: "Review created".to_string(),
            stats,
        }),
    ))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    RateLimited { retry_after: Duration },
    Upstream { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<InvalidCoordinate> for AppError {
    fn from(e: InvalidCoordinate) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<Arc<StationError>> for AppError {
    fn from(e: Arc<StationError>) -> Self {
        AppError::Upstream {
            message: format!("Station provider unavailable: {e}"),
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(e: ReviewError) -> Self {
        match e {
            ReviewError::MissingStationId | ReviewError::InvalidRating(_) => {
                AppError::BadRequest {
                    message: e.to_string(),
                }
            }
            ReviewError::Database(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<MapsError> for AppError {
    fn from(e: MapsError) -> Self {
        match e {
            MapsError::NotConfigured => AppError::Unavailable {
                message: "Routing is not configured".to_string(),
            },
            MapsError::NoRoute => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Whole seconds a client should wait, never zero.
fn retry_after_secs(retry_after: Duration) -> u64 {
    (retry_after.as_secs_f64().ceil() as u64).max(1)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Upstream { message }
            | AppError::Unavailable { message }
            | AppError::Internal { message } => message.clone(),
            AppError::RateLimited { .. } => "Too many requests, please try again later".to_string(),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            debug!(%status, "{message}");
        }

        let mut response = (status, Json(ErrorResponse { error: message })).into_response();
        if let AppError::RateLimited { retry_after } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs(retry_after)));
        }
        response
    }
}
