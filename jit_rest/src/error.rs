use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use jit_core::JitError;

/// Error body shared by every failure path: a short summary, a fixed
/// explanation where one exists, and the specific detail that triggered
/// the failure. Stack traces and engine model internals never leak.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub details: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// The body could not be parsed as the expected JSON structure.
    MalformedInput(String),
    /// Structurally valid input that violates a semantic rule.
    SemanticViolation(String),
    /// Engine-level or internal failure.
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedInput(rejection.body_text())
    }
}

impl From<JitError> for ApiError {
    fn from(err: JitError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, description, details) = match self {
            ApiError::MalformedInput(details) => (
                StatusCode::BAD_REQUEST,
                "Bad request",
                Some("The server isn't able to parse the given input"),
                details,
            ),
            ApiError::SemanticViolation(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Unprocessable entity",
                Some(
                    "The server understands the structure of the given input, \
                     but its semantics is invalid",
                ),
                details,
            ),
            ApiError::Internal(details) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error", None, details)
            }
        };
        let body = ErrorBody {
            error: error.to_string(),
            description: description.map(str::to_string),
            details,
        };
        (status, Json(body)).into_response()
    }
}
