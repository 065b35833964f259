//! Error types for the Intake API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Body returned for a payload that cannot be read as an order.
pub const MALFORMED_ORDER_MESSAGE: &str = "Invalid order request format.";

/// Error returned from HTTP handlers.
///
/// Validation failures are not errors here: an invalid order still gets a
/// `200` with an INVALID confirmation.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body is not an order (400)
    MalformedPayload,

    /// Accepted order could not be handed downstream (503)
    PublishUnavailable,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn malformed() -> Self {
        ApiError::new(ErrorCode::MalformedPayload, MALFORMED_ORDER_MESSAGE)
    }

    pub fn publish_unavailable(reason: impl std::fmt::Display) -> Self {
        ApiError::new(
            ErrorCode::PublishUnavailable,
            format!("Order could not be queued for processing: {reason}"),
        )
    }

    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::MalformedPayload => StatusCode::BAD_REQUEST,
            ErrorCode::PublishUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.code {
            // Plain text, as existing clients expect
            ErrorCode::MalformedPayload => (self.status(), self.message).into_response(),
            ErrorCode::PublishUnavailable => (self.status(), Json(self)).into_response(),
        }
    }
}

/// Failure pushing an accepted order to the downstream queue.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::malformed().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::publish_unavailable("publish channel is closed").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::publish_unavailable("publish buffer is full (capacity 4)");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "PUBLISH_UNAVAILABLE");
        assert_eq!(
            json["message"],
            "Order could not be queued for processing: publish buffer is full (capacity 4)"
        );
    }
}
