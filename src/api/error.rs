//! HTTP mapping of tracker and storage errors.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::{ErrorKind, TrackerError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    /// Storage failure, passed through to the client without retry.
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
    #[error("lock error")]
    Lock,
    /// Request body or query string that could not be decoded.
    #[error("{0}")]
    BadRequest(String),
    /// Path segment that cannot name any entity, e.g. a malformed id.
    #[error("{0}")]
    BadPath(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Tracker(e) => match e.kind() {
                ErrorKind::Validation => "validation",
                ErrorKind::NotFound => "not_found",
                ErrorKind::State => "state",
            },
            ApiError::Storage(_) | ApiError::Lock => "storage",
            ApiError::BadRequest(_) => "validation",
            ApiError::BadPath(_) => "not_found",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Tracker(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::State => StatusCode::CONFLICT,
            },
            ApiError::Storage(_) | ApiError::Lock => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BadPath(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        })
    }
}
