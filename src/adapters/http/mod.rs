//! HTTP adapters - REST API implementations.
//!
//! [`app_router`] assembles the full service: conversation endpoints, a
//! health probe, and the tower-http middleware stack.

pub mod conversation;

use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use conversation::ErrorResponse;
pub use conversation::{conversation_router, ConversationAppState};

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the application router with middleware from `server`.
pub fn app_router(state: ConversationAppState, server: &ServerConfig) -> Router {
    conversation_router(state)
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(
            server.request_timeout(),
            request_timeout_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(server))
}

/// Cuts off requests that run past `limit` with a 500 `INTERNAL_ERROR` body,
/// the same shape as a failed agent turn.
async fn request_timeout_middleware(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!(path = %path, timeout_secs = limit.as_secs(), "request timed out");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(format!(
                    "Request timed out after {}s",
                    limit.as_secs()
                ))),
            )
                .into_response()
        }
    }
}

/// Configured origins only; any origin when none are configured.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    cors.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
