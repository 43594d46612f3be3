//! Food and presence poll endpoints.
//!
//! Every outcome, including bad input, is a 200 response carrying
//! `success`. Bodies are parsed by hand so that malformed JSON is reported
//! the same way.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use where2go_common::{AppError, AppResult};
use where2go_core::{FoodPollData, FoodPollSnapshot, PresenceData, PresencePollSnapshot};
use where2go_db::entities::Presence;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Food poll tallies plus the caller's votes.
#[derive(Debug, Serialize)]
pub struct FoodPollResponse {
    pub poll_data: FoodPollData,
    pub user_votes: Vec<i32>,
}

impl From<FoodPollSnapshot> for FoodPollResponse {
    fn from(snapshot: FoodPollSnapshot) -> Self {
        Self {
            poll_data: snapshot.poll_data,
            user_votes: snapshot.user_votes,
        }
    }
}

/// Presence tallies plus the caller's value.
#[derive(Debug, Serialize)]
pub struct PresencePollResponse {
    pub presence_data: PresenceData,
    pub user_vote: Option<Presence>,
}

impl From<PresencePollSnapshot> for PresencePollResponse {
    fn from(snapshot: PresencePollSnapshot) -> Self {
        Self {
            presence_data: snapshot.presence_data,
            user_vote: snapshot.user_vote,
        }
    }
}

fn parse_object(body: &[u8]) -> AppResult<serde_json::Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(AppError::BadRequest("Invalid JSON body".to_string())),
    }
}

/// `category_id` as a JSON number or a numeric string.
fn parse_category_id(body: &[u8]) -> AppResult<i32> {
    let invalid = || AppError::Validation("Invalid category_id".to_string());

    match parse_object(body)?.get("category_id") {
        None | Some(Value::Null) => Err(AppError::Validation(
            "category_id is required".to_string(),
        )),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// `presence_value`: `"present"`, `"absent"`, or null/missing to clear.
fn parse_presence(body: &[u8]) -> AppResult<Option<Presence>> {
    match parse_object(body)?.get("presence_value") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Presence::parse(s)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid presence_value: {s}"))),
        Some(_) => Err(AppError::Validation("Invalid presence_value".to_string())),
    }
}

async fn food_vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResponse<FoodPollResponse> {
    let result = async {
        let category_id = parse_category_id(&body)?;
        state
            .poll_service
            .toggle_food_vote(user.id, category_id)
            .await
    }
    .await;

    result.map(FoodPollResponse::from).into()
}

async fn food_data(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> ApiResponse<FoodPollResponse> {
    state
        .poll_service
        .food_poll_snapshot(user.id)
        .await
        .map(FoodPollResponse::from)
        .into()
}

async fn presence_vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResponse<PresencePollResponse> {
    let result = async {
        let presence = parse_presence(&body)?;
        state.poll_service.set_presence(user.id, presence).await
    }
    .await;

    result.map(PresencePollResponse::from).into()
}

async fn presence_data(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> ApiResponse<PresencePollResponse> {
    state
        .poll_service
        .presence_snapshot(user.id)
        .await
        .map(PresencePollResponse::from)
        .into()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/food-poll/vote", post(food_vote))
        .route("/food-poll/data", get(food_data))
        .route("/presence-poll/vote", post(presence_vote))
        .route("/presence-poll/data", get(presence_data))
}
