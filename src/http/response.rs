//! Error responses.
//!
//! # Responsibilities
//! - Map service failures to status codes
//! - Render a uniform JSON error body
//!
//! # Design Decisions
//! - Invalid input → 400 with the validation message
//! - Anything else → 500 with a fixed message; the cause is only logged

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::requests::{ErrorKind, ServiceError};

pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// A service failure on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self(ServiceError::invalid(message))
    }

    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let message = match &self.0 {
            ServiceError::InvalidInput(message) => {
                tracing::debug!(%message, "Rejected invalid input");
                message.clone()
            }
            ServiceError::Unknown(e) => {
                tracing::error!(error = %e, "Request failed");
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
        };

        let body = ErrorBody {
            error: kind.code().to_string(),
            message,
        };
        (self.status(), Json(body)).into_response()
    }
}
