//! The HTTP-facing error taxonomy and its conversion into the stable JSON
//! bodies clients observe.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::RequestId;

/// Errors surfaced on the HTTP admission/dispatch path.
#[derive(Debug, Error)]
pub enum HttpError {
    /// `BackpressureController::try_acquire` failed: the server is at
    /// `normal_capacity`.
    #[error("server at normal capacity")]
    CapacityExceeded,

    /// `RequestMailbox::send` failed after a capacity slot was already
    /// acquired.
    #[error("request queue is full")]
    QueueFull,

    /// A route handler panicked; recovered at the worker boundary.
    #[error("handler panicked while processing request {0}")]
    HandlerPanic(RequestId),

    /// No route matched the request's method and path.
    #[error("no route matches this request")]
    NotFound,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::CapacityExceeded => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "capacity_exceeded",
                    "message": "Server at normal capacity - backpressure applied",
                    "code": "BACKPRESSURE",
                })),
            )
                .into_response(),
            HttpError::QueueFull => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "queue_full",
                    "message": "Server overloaded - backpressure applied",
                    "code": "BACKPRESSURE",
                })),
            )
                .into_response(),
            HttpError::HandlerPanic(request_id) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "handler_panic",
                    "request_id": request_id.to_string(),
                })),
            )
                .into_response(),
            HttpError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn capacity_exceeded_has_the_stable_body() {
        let response = HttpError::CapacityExceeded.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["code"], "BACKPRESSURE");
        assert_eq!(value["error"], "capacity_exceeded");
    }

    #[tokio::test]
    async fn queue_full_has_the_stable_body() {
        let response = HttpError::QueueFull.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "queue_full");
    }

    #[tokio::test]
    async fn not_found_is_plain_text() {
        let response = HttpError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Not Found");
    }
}
