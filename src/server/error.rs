//! Mapping of unwrap errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;

use crate::error_handling::{ResolveError, UnwrapError};

/// Error returned by every API handler, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError(pub UnwrapError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            UnwrapError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            UnwrapError::Resolve(ResolveError::MalformedUrl(_)) => StatusCode::BAD_REQUEST,
            UnwrapError::NotFound(_) => StatusCode::NOT_FOUND,
            UnwrapError::Resolve(_) => StatusCode::BAD_GATEWAY,
            UnwrapError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UnwrapError> for ApiError {
    fn from(error: UnwrapError) -> Self {
        Self(error)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        Self(UnwrapError::Storage(error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("API request failed: {}", self.0);
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Unwraps a JSON body, turning a rejection into a 400 with the usual shape.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError(UnwrapError::InvalidRequest(format!("invalid JSON body: {e}"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (UnwrapError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                UnwrapError::Resolve(ResolveError::MalformedUrl("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (UnwrapError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                UnwrapError::Storage(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError(error).status(), expected);
        }
    }

    #[test]
    fn test_sqlx_error_converts_to_storage() {
        let error: ApiError = sqlx::Error::PoolClosed.into();
        assert!(matches!(error.0, UnwrapError::Storage(_)));
    }
}
