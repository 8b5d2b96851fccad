//! Rate limit gate for credential endpoints

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::warn;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Derive the rate-limit bucket for a request
///
/// Prefers the first address in `X-Forwarded-For`, then the peer IP of
/// the connection, then a shared `"unknown"` bucket.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match (forwarded, peer) {
        (Some(client), _) => client.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// Peer address recorded by `into_make_service_with_connect_info`
pub(crate) fn peer_addr(request: &Request) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

/// Reject the request with 429 once its client exhausts the window
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(request.headers(), peer_addr(&request));

    if !state.rate_limiter().allow(&key) {
        warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    Ok(next.run(request).await)
}
