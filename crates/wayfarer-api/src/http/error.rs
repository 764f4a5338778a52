//! Application error type mapping to HTTP status codes.
//!
//! Clients receive a flat `{ "error": "<message>" }` body; the status code
//! carries the category.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use wayfarer_types::error::SessionError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Conversation/session errors.
    Session(SessionError),
    /// Missing or malformed request parameters.
    Validation(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Session(SessionError::NotFound) => {
                (StatusCode::NOT_FOUND, SessionError::NotFound.to_string())
            }
            AppError::Session(SessionError::DuplicateId(id)) => (
                StatusCode::CONFLICT,
                format!("conversation '{id}' already exists"),
            ),
            AppError::Session(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
