//! Credential routes
//!
//! `/login` and `/register` sit behind the rate-limit gate. The gate is
//! attached to the POST handlers rather than the router, so other methods
//! get 405 from the method fallback without spending budget.

use super::extract::JsonBody;
use crate::error::ApiResult;
use crate::rate_limit::rate_limit;
use crate::state::AppState;
use authgate_shared::{CredentialsRequest, MessageResponse, TokenResponse};
use axum::{extract::State, middleware, routing::post, Json, Router};

/// Create credential routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let gate = middleware::from_fn_with_state(state, rate_limit);

    Router::new()
        .route("/login", post(login).route_layer(gate.clone()))
        .route("/register", post(register).route_layer(gate))
}

/// Login with username and password
///
/// POST /login
async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let tokens = state.credentials().login(&req).await?;
    Ok(Json(tokens))
}

/// Register a new user
///
/// POST /register
async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.credentials().register(&req).await?;
    Ok(Json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}
