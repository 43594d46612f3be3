//! Main page data for a signed-in user.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use where2go_common::AppResult;
use where2go_core::{FoodPollData, PresenceData, RestaurantListing};
use where2go_db::entities::{Presence, category};

use crate::{extractors::AuthUser, middleware::AppState, response::UserResponse};

/// Everything the dashboard renders.
#[derive(Serialize)]
pub struct DashboardResponse {
    pub user: UserResponse,
    pub categories: Vec<category::Model>,
    pub restaurants: Vec<RestaurantListing>,
    pub poll_data: FoodPollData,
    pub user_votes: Vec<i32>,
    pub presence_data: PresenceData,
    pub user_vote: Option<Presence>,
}

async fn dashboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DashboardResponse>> {
    let categories = state.catalog_service.list_categories().await?;
    let restaurants = state.catalog_service.list_restaurants().await?;
    let food = state.poll_service.food_poll_snapshot(user.id).await?;
    let presence = state.poll_service.presence_snapshot(user.id).await?;

    Ok(Json(DashboardResponse {
        user: user.into(),
        categories,
        restaurants,
        poll_data: food.poll_data,
        user_votes: food.user_votes,
        presence_data: presence.presence_data,
        user_vote: presence.user_vote,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}
