use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::dataset::DatasetError;
use crate::ingest::IngestError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// One or more required selections are missing
    Validation(String),
    /// An option query's parent selection does not exist
    NotFound(String),
    /// The dataset artifact or its sources could not be loaded
    DatasetUnavailable(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::DatasetUnavailable(msg) => write!(f, "Dataset unavailable: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::DatasetUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Self::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let error = json!({
            "message": error_message,
            "type": error_type_name(&self),
        });

        // Option lookups answer "not found" with an empty list alongside the error.
        let body = match self {
            Self::NotFound(_) => Json(json!({ "options": [], "error": error })),
            _ => Json(json!({ "error": error })),
        };

        (status, body).into_response()
    }
}

pub fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::Validation(_) => "validation_error",
        AppError::NotFound(_) => "not_found",
        AppError::DatasetUnavailable(_) => "dataset_unavailable",
        AppError::InternalError(_) => "internal_error",
    }
}

// Implement conversions from common error types
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

/// Unparseable or wrongly typed request bodies are the caller's fault.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InternalError(format!("JSON error: {}", err))
    }
}

impl From<DatasetError> for AppError {
    fn from(err: DatasetError) -> Self {
        Self::DatasetUnavailable(err.to_string())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        Self::DatasetUnavailable(err.to_string())
    }
}
