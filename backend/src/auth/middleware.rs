//! Authentication middleware
//!
//! Guards protected routes. The `Authorization` header carries the token
//! either bare or with a `Bearer ` prefix. Requests without a valid token
//! never reach the wrapped handler.

use super::jwt::{TokenError, TokenService};
use crate::error::ApiError;
use crate::rate_limit::{client_key, peer_addr};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

/// Authenticated caller, inserted into request extensions by [`require_auth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

/// Outcome of inspecting a request's credentials
#[derive(Debug)]
pub enum TokenState {
    NoToken,
    InvalidToken(TokenError),
    ValidToken(AuthUser),
}

impl TokenState {
    /// Classify the `Authorization` header of a request
    pub fn inspect(headers: &HeaderMap, tokens: &TokenService) -> Self {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return TokenState::NoToken;
        };
        let Ok(value) = value.to_str() else {
            return TokenState::InvalidToken(TokenError::Malformed);
        };

        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            return TokenState::NoToken;
        }

        match tokens.verify(token) {
            Ok(username) => TokenState::ValidToken(AuthUser { username }),
            Err(e) => TokenState::InvalidToken(e),
        }
    }
}

/// Middleware that admits only requests carrying a valid token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_key(request.headers(), peer_addr(&request));
    info!(client = %client, path = %request.uri().path(), "Access attempt");

    match TokenState::inspect(request.headers(), state.tokens()) {
        TokenState::NoToken => {
            warn!(client = %client, "Missing token");
            Err(ApiError::Unauthorized("Missing token".to_string()))
        }
        TokenState::InvalidToken(e) => {
            warn!(client = %client, reason = %e, "Invalid token");
            Err(ApiError::Unauthorized("Invalid token".to_string()))
        }
        TokenState::ValidToken(user) => {
            info!(client = %client, username = %user.username, "Access granted");
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
    }
}
