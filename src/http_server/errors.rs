//! # HTTP API Errors
//!
//! Maps course, pagination and decoding failures onto status codes and the
//! JSON error body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::course::CourseError;
use crate::pagination::PaginationError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be decoded
    #[error("Invalid request format: '{0}'")]
    InvalidBody(String),

    /// Query string could not be decoded
    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Course(#[from] CourseError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Course(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Pagination(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = Json(ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
