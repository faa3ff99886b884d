//! Error types for the gantry gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use openapi_server::models::ErrorResponse;
use thiserror::Error;

/// Main error type for the gateway
///
/// Backend errors are surfaced with the operation and target prepended to
/// the scheduler's own message; the kind is never rewritten.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Malformed quantity: {0}")]
    MalformedQuantity(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GatewayError {
    /// HTTP status reported to gateway callers
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MalformedQuantity(_) | GatewayError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::BackendUnavailable(_) | GatewayError::Backend { .. } => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::ConfigError(_)
            | GatewayError::ServerError(_)
            | GatewayError::IoError(_)
            | GatewayError::JsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a non-success reply from a scheduler
    pub fn from_backend_status(status: u16, context: &str, detail: &str) -> Self {
        let message = format!("{}: {}", context, detail);
        match status {
            404 => GatewayError::NotFound(message),
            409 => GatewayError::Conflict(message),
            _ => GatewayError::Backend { status, message },
        }
    }

    /// Classify a transport failure while talking to a scheduler
    pub fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_backend_status(status.as_u16(), context, &err.to_string());
        }
        if err.is_decode() {
            return GatewayError::Backend {
                status: 200,
                message: format!("{}: undecodable response: {}", context, err),
            };
        }
        GatewayError::BackendUnavailable(format!("{}: {}", context, err))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
