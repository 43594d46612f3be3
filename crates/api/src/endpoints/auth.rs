//! Login, registration and logout.

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use where2go_common::{AppError, AppResult};
use where2go_core::RegisterInput;
use where2go_db::entities::user;

use crate::{
    extractors::MaybeAuthUser,
    middleware::AppState,
    session::{end_session, start_session},
};

const INVALID_CREDENTIALS: &str = "Invalid username/email or password";

/// Description of the auth page for clients that render it themselves.
#[derive(Serialize)]
pub struct AuthPage {
    pub page: &'static str,
    pub form_types: [&'static str; 2],
}

const AUTH_PAGE: AuthPage = AuthPage {
    page: "auth",
    form_types: ["login", "register"],
};

/// Combined login/registration form.
///
/// `form_type` selects which of the remaining fields are read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthForm {
    pub form_type: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

async fn auth_page(MaybeAuthUser(user): MaybeAuthUser) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    Json(AUTH_PAGE).into_response()
}

async fn submit(
    MaybeAuthUser(current): MaybeAuthUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AuthForm>,
) -> Response {
    if current.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let result = match form.form_type.as_str() {
        "login" => {
            state
                .user_service
                .authenticate(form.username.trim(), &form.password)
                .await
        }
        "register" => {
            let input = RegisterInput {
                username: form.username.trim().to_string(),
                email: form.email.trim().to_string(),
                password1: form.password1,
                password2: form.password2,
            };
            state.user_service.register(input).await
        }
        _ => return Json(AUTH_PAGE).into_response(),
    };

    match result.and_then(session_token) {
        Ok(token) => (
            start_session(jar, &state.session, token),
            Redirect::to("/dashboard"),
        )
            .into_response(),
        Err(AppError::Unauthorized) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {
                    "code": AppError::Unauthorized.error_code(),
                    "message": INVALID_CREDENTIALS,
                }
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

fn session_token(user: user::Model) -> AppResult<String> {
    user.token
        .ok_or_else(|| AppError::Internal(format!("user {} has no session token", user.id)))
}

/// End the session everywhere by rotating the token.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    MaybeAuthUser(user): MaybeAuthUser,
) -> AppResult<(CookieJar, Redirect)> {
    if let Some(user) = user {
        state.user_service.regenerate_token(user.id).await?;
        info!(user_id = user.id, "User logged out");
    }

    Ok((end_session(jar, &state.session), Redirect::to("/auth")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(auth_page))
        .route("/auth", get(auth_page).post(submit))
        .route("/logout", get(logout))
}
