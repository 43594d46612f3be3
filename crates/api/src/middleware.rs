//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use where2go_common::config::SessionConfig;
use where2go_core::{
    CatalogService, PollService, ReviewService, StatisticsService, UserService, WeatherService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub poll_service: PollService,
    pub catalog_service: CatalogService,
    pub review_service: ReviewService,
    pub statistics_service: StatisticsService,
    pub weather_service: WeatherService,
    pub session: SessionConfig,
}

/// Pull the session token from the request.
///
/// A bearer token wins over the session cookie.
fn session_token(req: &Request<Body>, cookie_name: &str) -> Option<String> {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    CookieJar::from_headers(req.headers())
        .get(cookie_name)
        .map(|c| c.value().to_string())
}

/// Authentication middleware.
///
/// Resolves the session token to an active user and stores the model in the
/// request extensions. Requests without a valid session pass through
/// anonymously; the extractors decide whether that is acceptable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = session_token(&req, &state.session.cookie_name)
        && !token.is_empty()
    {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) if e.is_server_error() => {
                tracing::error!(error = %e, "Session lookup failed");
            }
            Err(_) => {
                tracing::debug!("Ignoring unknown or inactive session token");
            }
        }
    }

    next.run(req).await
}
