//! HTTP error envelope and mapping from domain errors.
//!
//! Keeps the domain free of transport concerns: [`crate::domain::Error`]
//! values are translated into Actix responses here and nowhere else.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// JSON body rendered for every error response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    pub code: ErrorCode,
    /// Human-readable message.
    #[schema(example = "no data recorded for district 7")]
    pub message: String,
    /// Supplementary structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Domain error carried through an Actix handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError(Error);

impl ApiError {
    /// The wrapped domain error.
    #[must_use]
    pub fn inner(&self) -> &Error {
        &self.0
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = if self.0.code() == ErrorCode::Internal {
            // Internal failure details stay in the logs, not on the wire.
            error!(message = self.0.message(), "internal error reached the HTTP boundary");
            ErrorBody {
                code: ErrorCode::Internal,
                message: "internal server error".to_owned(),
                details: None,
            }
        } else {
            ErrorBody {
                code: self.0.code(),
                message: self.0.message().to_owned(),
                details: self.0.details().cloned(),
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
