//! Response types for the Payroll Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::MissingInput { field } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "MISSING_INPUT",
                    message,
                    format!("Required input '{}' was not provided", field),
                ),
            ),
            EngineError::EmployeeNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message),
            ),
            EngineError::InvalidNumericField { field, .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_NUMERIC_FIELD",
                    message,
                    format!("Field '{}' must be a number", field),
                ),
            ),
            EngineError::NonPositiveRate { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("NON_POSITIVE_RATE", message),
            ),
            EngineError::AmountOverflow { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("AMOUNT_OUT_OF_RANGE", message),
            ),
            EngineError::RecordSource { .. } => Self::new(
                StatusCode::BAD_GATEWAY,
                ApiError::new("RECORD_SOURCE_ERROR", message),
            ),
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::LeaveRequestNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("LEAVE_REQUEST_NOT_FOUND", message),
            ),
            EngineError::InsufficientLeaveBalance { .. }
            | EngineError::InvalidLeaveTransition { .. } => {
                Self::new(StatusCode::CONFLICT, ApiError::new("LEAVE_CONFLICT", message))
            }
            EngineError::InvalidLeavePeriod { .. } => {
                Self::new(StatusCode::BAD_REQUEST, ApiError::validation_error(message))
            }
            EngineError::PermissionDenied { .. } => Self::new(
                StatusCode::FORBIDDEN,
                ApiError::new("PERMISSION_DENIED", message),
            ),
        }
    }
}

/// Body of `GET /tax/brackets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBracketsResponse {
    /// Code of the loaded schedule.
    pub schedule: String,
    /// One line per bracket, lowest first.
    pub brackets: Vec<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Code of the loaded schedule.
    pub schedule: String,
}
