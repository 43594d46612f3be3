//! HTTP API layer for where2go.
//!
//! - **Endpoints**: auth, dashboard, polls, weather and the admin actions
//! - **Extractors**: [`extractors::AuthUser`] and [`extractors::AdminUser`]
//! - **Middleware**: session resolution from cookie or bearer token
//! - **Flash**: one-shot admin status messages carried in a cookie
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod flash;
pub mod middleware;
pub mod response;
pub mod session;

use axum::{Router, middleware::from_fn_with_state};

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};

/// All routes with session resolution applied, ready to serve.
pub fn app(state: AppState) -> Router {
    router()
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
