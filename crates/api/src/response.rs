//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use where2go_common::AppError;
use where2go_db::entities::user;

/// Success/failure envelope used by the poll and weather endpoints.
///
/// Always sent with status 200 so the page can show `error` without treating
/// transport failures specially. On success the payload fields sit next to
/// `success`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failure response with a user-facing message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T: Serialize> From<Result<T, AppError>> for ApiResponse<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                if e.is_server_error() {
                    tracing::error!(error = %e, code = e.error_code(), "Request failed");
                } else {
                    tracing::debug!(error = %e, code = e.error_code(), "Request rejected");
                }
                Self::fail(e.user_message())
            }
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Public view of a user account.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_superuser: user.is_superuser,
            is_active: user.is_active,
            created_at: user.created_at.to_rfc3339(),
            last_login_at: user.last_login_at.map(|t| t.to_rfc3339()),
        }
    }
}
