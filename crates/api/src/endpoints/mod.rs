//! API endpoints.

mod admin;
mod auth;
mod dashboard;
mod poll;
mod weather;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(poll::router())
        .merge(weather::router())
        .merge(admin::router())
}
