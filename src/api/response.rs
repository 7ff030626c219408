//! JSON response envelopes
//!
//! Every response body has the shape `{ success, message?, data? }`. Server
//! errors carry a fixed, route-specific message; internal detail stays in
//! the logs.

use crate::error::CritiqueError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const CREATED_MESSAGE: &str = "Feedback generated successfully";
pub const CREATE_FAILED_MESSAGE: &str = "Error generating feedback";
pub const HISTORY_FAILED_MESSAGE: &str = "Error fetching feedback history";
pub const UNAUTHORIZED_MESSAGE: &str = "Not authorized";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Error outcome rendered as `{ success: false, message }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE)
    }

    /// Map a service error, hiding server-side detail behind `generic`
    pub fn from_service(err: CritiqueError, generic: &'static str) -> Self {
        match err {
            CritiqueError::Validation(message) => Self::bad_request(message),
            CritiqueError::Unauthorized(_) => Self::unauthorized(),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, generic),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            message: Some(self.message),
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}
