use std::sync::Arc;

use axum::{
    extract::{FromRef, Request, State},
    http::{HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::config::AppConfig;
use crate::state::AppState;

pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// Plain equality, not constant time.
pub fn key_matches(provided: &str, expected: &str) -> bool {
    !provided.is_empty() && provided == expected
}

/// Rejects the request with 401 unless `X-API-Key` equals the configured key.
pub async fn require_api_key(
    State(config): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let authorized = req
        .headers()
        .get(&API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|provided| key_matches(provided, &config.api_key));

    if !authorized {
        warn!(method = %req.method(), path = %req.uri().path(), "missing or invalid api key");
        return unauthorized();
    }

    next.run(req).await
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
}
