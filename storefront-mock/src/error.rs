//! Error types for the mock backend.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use storefront_model::NormalizationError;
use thiserror::Error;

/// Result type for seeding.
pub type MockResult<T> = Result<T, MockError>;

/// Errors raised while preparing the backend's data.
#[derive(Debug, Error)]
pub enum MockError {
    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not a JSON array of sections.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A seeded section failed normalization.
    #[error("seed section {id} is invalid: {source}")]
    InvalidSeed {
        id: String,
        source: NormalizationError,
    },
}

/// A request the API refuses, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl From<NormalizationError> for ApiError {
    fn from(e: NormalizationError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
