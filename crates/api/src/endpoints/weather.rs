//! Friday-evening forecast endpoint.

use axum::{Router, extract::State, routing::get};
use where2go_common::AppError;
use where2go_core::WeatherReport;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn weather_data(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> ApiResponse<WeatherReport> {
    state
        .weather_service
        .friday_forecast()
        .await
        .map_err(AppError::from)
        .into()
}

pub fn router() -> Router<AppState> {
    Router::new().route("/weather/data", get(weather_data))
}
