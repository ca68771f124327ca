//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`. Responses always use the shared envelope shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::{ApiResponse, FieldError};
use crate::services::geocode::GeocodeError;

/// Application-level error type for the ordering backend.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Geocoding provider failed; aborts the delivery webhook.
    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Field-level validation errors, returned as a 400 array envelope.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Device/guest identity headers (or cookies) are missing or malformed.
    #[error("Missing required headers: device_id and/or tid")]
    MissingIdentity,

    /// Referential integrity is broken (e.g. basket without a session).
    /// Not recoverable client-side beyond starting over.
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Single-field validation failure.
    #[must_use]
    pub fn invalid_field(key: &str, message: &str) -> Self {
        Self::Validation(vec![FieldError::new(key, message)])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Integrity(_) | Self::Geocode(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) | Self::Integrity(_) | Self::Geocode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Validation(_) | Self::MissingIdentity | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        };

        // Validation failures carry the field array; everything else carries
        // no data, and internal detail never leaks to the client.
        let message = match status {
            StatusCode::BAD_REQUEST => match &self {
                Self::Validation(_) => "Validation failed.".to_owned(),
                other => other.to_string(),
            },
            _ => "Internal Server Error".to_owned(),
        };

        let errors = match self {
            Self::Validation(errors) => errors,
            _ => Vec::new(),
        };

        ApiResponse::new(status, errors, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = AppError::invalid_field("name", "Please enter the name");
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_identity_maps_to_400() {
        assert_eq!(get_status(AppError::MissingIdentity), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_integrity_maps_to_500() {
        let err = AppError::Integrity("no session for basket".to_owned());
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = AppError::Internal("connection refused to 10.0.0.3".to_owned());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display() {
        let err = AppError::BadRequest("missing basketId".to_owned());
        assert_eq!(err.to_string(), "Bad request: missing basketId");
    }
}
