//! Admin view and actions.
//!
//! Mutating actions answer `303 See Other` to the admin dashboard and leave
//! their outcome in the flash cookie.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use where2go_common::{AppError, AppResult};
use where2go_core::{
    AdminCreateUserInput, CreateReviewInput, RECENT_REVIEWS_LIMIT, RestaurantListing,
    ReviewListing, Statistics,
};
use where2go_db::entities::category;

use crate::{
    extractors::AdminUser,
    flash::{Flash, set_flash, take_flash},
    middleware::AppState,
    response::UserResponse,
};

const ADMIN_DASHBOARD: &str = "/admin-dashboard";

/// Admin overview.
#[derive(Serialize)]
pub struct AdminDashboardResponse {
    pub categories: Vec<category::Model>,
    pub restaurants: Vec<RestaurantListing>,
    pub users: Vec<UserResponse>,
    pub recent_reviews: Vec<ReviewListing>,
    pub stats: Statistics,
    pub flash: Option<Flash>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddCategoryForm {
    pub category_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddRestaurantForm {
    pub restaurant_name: String,
    pub restaurant_category: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddReviewForm {
    pub review_user: String,
    pub review_restaurant: String,
    pub rating: String,
    pub comment: String,
}

impl AddReviewForm {
    fn into_input(self) -> AppResult<CreateReviewInput> {
        let (Ok(user_id), Ok(restaurant_id)) = (
            self.review_user.trim().parse(),
            self.review_restaurant.trim().parse(),
        ) else {
            return Err(AppError::Validation(
                "User and restaurant are required".to_string(),
            ));
        };
        let rating = self
            .rating
            .trim()
            .parse()
            .map_err(|_| AppError::Validation("Rating must be between 1 and 5".to_string()))?;

        Ok(CreateReviewInput {
            user_id,
            restaurant_id,
            rating,
            comment: self.comment,
        })
    }
}

/// Turn an action outcome into the flash + redirect response.
fn finish(state: &AppState, jar: CookieJar, outcome: AppResult<String>) -> (CookieJar, Redirect) {
    let flash = match outcome {
        Ok(message) => Flash::success(message),
        Err(e) => {
            if e.is_server_error() {
                error!(error = %e, "Admin action failed");
            } else {
                info!(error = %e, "Admin action refused");
            }
            Flash::from(&e)
        }
    };

    (
        set_flash(jar, &state.session, &flash),
        Redirect::to(ADMIN_DASHBOARD),
    )
}

async fn admin_dashboard(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<AdminDashboardResponse>)> {
    let categories = state.catalog_service.list_categories_by_name().await?;
    let restaurants = state.catalog_service.list_restaurants().await?;
    let users = state.user_service.list().await?;
    let recent_reviews = state.review_service.list_recent(RECENT_REVIEWS_LIMIT).await?;
    let stats = state.statistics_service.collect().await?;

    let (jar, flash) = take_flash(jar, &state.session);

    Ok((
        jar,
        Json(AdminDashboardResponse {
            categories,
            restaurants,
            users: users.into_iter().map(UserResponse::from).collect(),
            recent_reviews,
            stats,
            flash,
        }),
    ))
}

async fn add_category(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AddCategoryForm>,
) -> (CookieJar, Redirect) {
    let outcome = state
        .catalog_service
        .create_category(&form.category_name)
        .await
        .map(|c| format!("Category \"{}\" added successfully!", c.name));
    finish(&state, jar, outcome)
}

async fn delete_category(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> (CookieJar, Redirect) {
    let outcome = state
        .catalog_service
        .delete_category(id)
        .await
        .map(|c| format!("Category \"{}\" deleted successfully!", c.name));
    finish(&state, jar, outcome)
}

async fn add_restaurant(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AddRestaurantForm>,
) -> (CookieJar, Redirect) {
    let category_id = form.restaurant_category.trim().parse().ok();
    let outcome = state
        .catalog_service
        .create_restaurant(&form.restaurant_name, category_id)
        .await
        .map(|r| format!("Restaurant \"{}\" added successfully!", r.name));
    finish(&state, jar, outcome)
}

async fn delete_restaurant(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> (CookieJar, Redirect) {
    let outcome = state
        .catalog_service
        .delete_restaurant(id)
        .await
        .map(|r| format!("Restaurant \"{}\" deleted successfully!", r.name));
    finish(&state, jar, outcome)
}

async fn add_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(input): Form<AdminCreateUserInput>,
) -> (CookieJar, Redirect) {
    let outcome = state
        .user_service
        .admin_create(input)
        .await
        .map(|u| format!("User \"{}\" created successfully!", u.username));
    finish(&state, jar, outcome)
}

async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> (CookieJar, Redirect) {
    let outcome = state
        .user_service
        .admin_delete(admin.id, id)
        .await
        .map(|d| format!("User \"{}\" deleted successfully!", d.username));
    finish(&state, jar, outcome)
}

async fn add_review(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AddReviewForm>,
) -> (CookieJar, Redirect) {
    let outcome = match form.into_input() {
        Ok(input) => state
            .review_service
            .create(input)
            .await
            .map(|r| format!("Review #{} added successfully!", r.id)),
        Err(e) => Err(e),
    };
    finish(&state, jar, outcome)
}

async fn delete_review(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> (CookieJar, Redirect) {
    let outcome = state.review_service.delete(id).await.map(|r| {
        format!(
            "Review by \"{}\" for \"{}\" deleted successfully!",
            r.username, r.restaurant_name
        )
    });
    finish(&state, jar, outcome)
}

async fn clear_all_polls(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let outcome = state
        .poll_service
        .clear_food_votes()
        .await
        .map(|n| format!("Cleared {n} polls successfully!"));
    finish(&state, jar, outcome)
}

async fn get_statistics(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<Statistics>> {
    Ok(Json(state.statistics_service.collect().await?))
}

async fn legacy_test(AdminUser(_admin): AdminUser) -> Redirect {
    Redirect::to(ADMIN_DASHBOARD)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin-dashboard", get(admin_dashboard))
        .route("/add-category", post(add_category))
        .route("/delete-category/{id}", post(delete_category))
        .route("/add-restaurant", post(add_restaurant))
        .route("/delete-restaurant/{id}", post(delete_restaurant))
        .route("/add-user", post(add_user))
        .route("/delete-user/{id}", post(delete_user))
        .route("/add-review", post(add_review))
        .route("/delete-review/{id}", post(delete_review))
        .route("/clear-all-polls", post(clear_all_polls))
        .route("/get-statistics", get(get_statistics))
        .route("/test", get(legacy_test))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn review_form(user: &str, restaurant: &str, rating: &str) -> AddReviewForm {
        AddReviewForm {
            review_user: user.to_string(),
            review_restaurant: restaurant.to_string(),
            rating: rating.to_string(),
            comment: "Buono".to_string(),
        }
    }

    #[test]
    fn test_review_form_parses_numbers() {
        let input = review_form("4", " 9 ", "5").into_input().unwrap();
        assert_eq!(input.user_id, 4);
        assert_eq!(input.restaurant_id, 9);
        assert_eq!(input.rating, 5);
        assert_eq!(input.comment, "Buono");
    }

    #[test]
    fn test_review_form_rejects_missing_ids_and_bad_rating() {
        let err = review_form("", "9", "5").into_input().unwrap_err();
        assert_eq!(err.user_message(), "User and restaurant are required");

        let err = review_form("4", "9", "five").into_input().unwrap_err();
        assert_eq!(err.user_message(), "Rating must be between 1 and 5");
    }
}
