//! Routes that require a valid bearer token

use crate::auth::{require_auth, AuthUser};
use crate::state::AppState;
use authgate_shared::ProtectedResponse;
use axum::{middleware, routing::get, Extension, Json, Router};

/// Create protected routes
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        "/secret",
        get(secret).route_layer(middleware::from_fn_with_state(state, require_auth)),
    )
}

/// GET /secret
async fn secret(Extension(user): Extension<AuthUser>) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "You are authorized!".to_string(),
        username: user.username,
    })
}
