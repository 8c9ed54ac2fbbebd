//! HTTP API for the trigger endpoint.
//!
//! Provides a single catch-all route:
//! - `POST <any path>` - authenticated trigger request
//! - any other method - unauthenticated health check

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::warn;
use trigger_common::{HealthResponse, TriggerError, TriggerResponse};

use crate::dispatch::Dispatcher;

/// Time allowed for the full request body to arrive.
pub const DEFAULT_BODY_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub dispatcher: Dispatcher,
    /// Deadline for reading the declared body once headers are in.
    pub body_timeout: Duration,
}

/// Create the HTTP router. The path is not inspected and the body size is
/// not capped, so any declared `Content-Length` is read in full.
pub fn create_router(state: HttpState) -> Router {
    Router::new()
        .fallback(request_handler)
        .layer(DefaultBodyLimit::disable())
        .with_state(Arc::new(state))
}

async fn request_handler(
    State(state): State<Arc<HttpState>>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Response {
    if method != Method::POST {
        return ok_json(HealthResponse::now());
    }

    let result = match read_body(body, state.body_timeout).await {
        Ok(bytes) => {
            let authorization = headers
                .get(header::AUTHORIZATION)
                .map(|value| value.as_bytes());
            state.dispatcher.handle(authorization, &bytes).await
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(response) => ok_json(response),
        Err(err) => error_json(&err),
    }
}

async fn read_body(body: Body, limit: Duration) -> Result<Bytes, TriggerError> {
    match tokio::time::timeout(limit, axum::body::to_bytes(body, usize::MAX)).await {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => Err(TriggerError::BadRequest {
            reason: format!("failed to read body: {e}"),
        }),
        Err(_) => Err(TriggerError::BodyTimeout {
            secs: limit.as_secs(),
        }),
    }
}

fn error_json(err: &TriggerError) -> Response {
    warn!("Rejecting request: {}", err);
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(TriggerResponse::from(err))).into_response()
}

fn ok_json<T: serde::Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(body),
    )
        .into_response()
}
