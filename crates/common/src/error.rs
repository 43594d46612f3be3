//! Error types for where2go.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A delete was refused because other rows still reference the target.
    #[error("{0}")]
    IntegrityBlocked(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) | Self::UserNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) | Self::IntegrityBlocked(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::IntegrityBlocked(_) => "INTEGRITY_BLOCKED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message suitable for showing to an end user.
    ///
    /// Server-side failures are collapsed into a generic sentence so that
    /// database details never reach the browser. Upstream failures keep their
    /// message, which is already phrased for the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg)
            | Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::IntegrityBlocked(msg)
            | Self::ExternalService(msg) => msg.clone(),
            Self::UserNotFound(_) => "User not found".to_string(),
            Self::Unauthorized => "Authentication required".to_string(),
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

/// Flatten validation failures into their human-readable messages.
///
/// Messages are sorted and deduplicated so the output is stable regardless of
/// field iteration order. Failures without a message fall back to their code.
#[must_use]
pub fn validation_messages(err: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = err
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map_or_else(|| e.code.to_string(), ToString::to_string)
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(validation_messages(&err).join("; "))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
