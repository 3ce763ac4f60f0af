use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use service::errors::ServiceError;

/// JSON error body returned by every handler.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: u32,
    pub detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &str, code: u32, detail: impl Into<String>) -> Self {
        Self { status, body: ErrorBody { error: error.to_string(), code, detail: detail.into() } }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        ServiceError::Forbidden(detail.into()).into()
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        ServiceError::Unauthorized(detail.into()).into()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let code = err.code();
        match err {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", code, msg),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", code, msg),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", code, msg),
            ServiceError::Unauthorized(msg) => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", code, msg),
            ServiceError::Forbidden(msg) => {
                warn!(detail = %msg, "request forbidden");
                Self::new(StatusCode::FORBIDDEN, "Forbidden", code, msg)
            }
            ServiceError::Unexpected(msg) => {
                // details stay in the log
                error!(code, detail = %msg, "unexpected service error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", code, "unexpected error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
