use axum::response::{IntoResponse, Json};
use serde_json::json;

/// Landing route; also the redirect target for anonymous requests to
/// protected paths. The login form itself is served by the frontend.
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "message": "Sign in via POST /api/login.",
    }))
}
