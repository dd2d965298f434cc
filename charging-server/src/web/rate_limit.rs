//! Per-client rate limiting for the expensive endpoints.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::limiter::Decision;

use super::routes::AppError;
use super::state::AppState;

/// Key used when nothing identifies the client.
const UNKNOWN_CLIENT: &str = "unknown";

/// Middleware that spends one token from the caller's bucket, or rejects
/// the request with 429.
pub(super) async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(request.headers(), peer);

    match state.limiter.check(&key) {
        Decision::Allowed => Ok(next.run(request).await),
        Decision::Denied { retry_after } => {
            debug!(client = %key, path = %request.uri().path(), ?retry_after, "rate limited");
            Err(AppError::RateLimited { retry_after })
        }
    }
}

/// Identify the client for rate limiting.
///
/// Prefers the first `X-Forwarded-For` entry, then `X-Real-IP`, then the
/// socket peer address.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| header_value(headers, "x-real-ip"))
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
