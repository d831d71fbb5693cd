use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error body sent to HTTP callers
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: serde_json::Value,
}

/// HTTP-facing wrapper mapping each error variant to a status code
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self.0 {
            Error::Validation(_) => "Invalid reading payload",
            Error::Database(_) | Error::Migration(_) => "Storage error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("API error: {}", self.0);
        let body = ErrorBody {
            message: self.message().to_string(),
            error: serde_json::json!({ "detail": self.0.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError(Error::Validation("motion must not be empty".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_maps_to_server_error() {
        let err = ApiError(Error::Database(sqlx::Error::PoolClosed));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
