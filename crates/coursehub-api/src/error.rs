//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use coursehub_core::error::{AppError, ErrorKind};

/// HTTP-facing wrapper around [`AppError`].
///
/// The core error type stays free of any axum dependency; this newtype
/// owns the response mapping, and the `From` impl lets handlers propagate
/// domain errors with `?`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Standard API error response body.
///
/// `error` is a stable machine-readable code so clients can distinguish
/// "link never existed" from "link existed but has expired / been revoked /
/// reached its limit".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match err.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict
            | ErrorKind::Expired
            | ErrorKind::Revoked
            | ErrorKind::Exhausted => StatusCode::CONFLICT,
            ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
            ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => {
                tracing::error!(kind = %err.kind, error = %err.message, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse {
            error: err.kind.to_string(),
            message: err.message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(AppError::validation("bad")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_identity_errors_map_to_401_and_403() {
        assert_eq!(
            status_of(AppError::unauthorized("who are you")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::forbidden("not yours")),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(status_of(AppError::not_found("gone")), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unusable_token_states_map_to_409() {
        assert_eq!(status_of(AppError::conflict("resolved")), StatusCode::CONFLICT);
        assert_eq!(status_of(AppError::expired("lapsed")), StatusCode::CONFLICT);
        assert_eq!(status_of(AppError::revoked("pulled")), StatusCode::CONFLICT);
        assert_eq!(status_of(AppError::exhausted("spent")), StatusCode::CONFLICT);
    }

    #[test]
    fn test_wrapping_preserves_kind_and_message() {
        let wrapped = ApiError::from(AppError::exhausted("limit reached"));
        assert_eq!(wrapped.0.kind, ErrorKind::Exhausted);
        assert_eq!(wrapped.0.message, "limit reached");
    }
}
