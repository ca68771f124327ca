//! Uniform response envelope.
//!
//! Every endpoint responds with `{statusCode, data, message, success}`.
//! Validation failures reuse the same envelope with `data` set to an array of
//! `{key, message}` field errors, so clients have exactly one shape to parse.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// A single field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub key: String,
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    #[must_use]
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// The response envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Build an envelope; `success` is derived from the status code.
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.is_success(),
        }
    }

    /// 200 OK envelope.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, message)
    }

    /// 201 Created envelope.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, data, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let envelope = ApiResponse::ok(vec![1, 2, 3], "listed");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["message"], "listed");
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_validation_envelope_shape() {
        let errors = vec![FieldError::new("phoneNumber", "Valid German phone number is required.")];
        let envelope = ApiResponse::new(StatusCode::BAD_REQUEST, errors, "Validation failed.");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"][0]["key"], "phoneNumber");
    }

    #[test]
    fn test_success_derived_from_status() {
        let envelope = ApiResponse::created((), "created");
        assert!(envelope.success);
        let envelope = ApiResponse::new(StatusCode::BAD_REQUEST, (), "bad");
        assert!(!envelope.success);
    }
}
