//! Restaurant review service.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;
use where2go_common::{AppError, AppResult};
use where2go_db::{
    entities::review,
    repositories::{RestaurantRepository, ReviewRepository, UserRepository},
};

/// How many reviews the admin overview shows.
pub const RECENT_REVIEWS_LIMIT: u64 = 10;

/// Input for creating a review.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewInput {
    pub user_id: i32,
    pub restaurant_id: i32,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: String,
}

/// A review with author and restaurant names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewListing {
    pub id: i32,
    pub username: String,
    pub restaurant_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<FixedOffset>,
}

/// Review service for business logic.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    user_repo: UserRepository,
    restaurant_repo: RestaurantRepository,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(
        review_repo: ReviewRepository,
        user_repo: UserRepository,
        restaurant_repo: RestaurantRepository,
    ) -> Self {
        Self {
            review_repo,
            user_repo,
            restaurant_repo,
        }
    }

    /// Create a review for an existing user and restaurant.
    pub async fn create(&self, input: CreateReviewInput) -> AppResult<review::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(input.user_id).await?;
        let restaurant = self.restaurant_repo.get_by_id(input.restaurant_id).await?;

        let review = self
            .review_repo
            .create(user.id, restaurant.id, input.rating, input.comment.trim())
            .await?;

        info!(
            review_id = review.id,
            user_id = user.id,
            restaurant_id = restaurant.id,
            rating = review.rating,
            "Review created"
        );
        Ok(review)
    }

    /// Delete a review, returning it with names resolved for the status message.
    pub async fn delete(&self, id: i32) -> AppResult<ReviewListing> {
        let review = self.review_repo.get_by_id(id).await?;
        let listing = self
            .resolve(vec![review])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

        self.review_repo.delete(id).await?;
        info!(review_id = id, "Review deleted");
        Ok(listing)
    }

    /// The most recent reviews, newest first.
    pub async fn list_recent(&self, limit: u64) -> AppResult<Vec<ReviewListing>> {
        let reviews = self.review_repo.find_recent(limit).await?;
        self.resolve(reviews).await
    }

    async fn resolve(&self, reviews: Vec<review::Model>) -> AppResult<Vec<ReviewListing>> {
        let mut user_ids: Vec<i32> = reviews.iter().map(|r| r.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let mut restaurant_ids: Vec<i32> = reviews.iter().map(|r| r.restaurant_id).collect();
        restaurant_ids.sort_unstable();
        restaurant_ids.dedup();

        let usernames: HashMap<i32, String> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let restaurant_names: HashMap<i32, String> = self
            .restaurant_repo
            .find_by_ids(&restaurant_ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|r| ReviewListing {
                id: r.id,
                username: usernames.get(&r.user_id).cloned().unwrap_or_default(),
                restaurant_name: restaurant_names
                    .get(&r.restaurant_id)
                    .cloned()
                    .unwrap_or_default(),
                rating: r.rating,
                comment: r.comment,
                created_at: r.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;
    use where2go_db::entities::{restaurant, user};

    fn create_service(db: DatabaseConnection) -> ReviewService {
        let db = Arc::new(db);
        ReviewService::new(
            ReviewRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            RestaurantRepository::new(db),
        )
    }

    fn create_test_user(id: i32, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            email: None,
            password_hash: "hash".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            token: None,
            is_superuser: false,
            is_active: true,
            created_at: Utc::now().into(),
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn test_rating_out_of_range_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = create_service(db);

        for rating in [0, 6] {
            let result = service
                .create(CreateReviewInput {
                    user_id: 1,
                    restaurant_id: 1,
                    rating,
                    comment: "meh".to_string(),
                })
                .await;

            match result {
                Err(AppError::Validation(msg)) => {
                    assert_eq!(msg, "Rating must be between 1 and 5");
                }
                other => panic!("Expected Validation, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_list_recent_resolves_names() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[review::Model {
                id: 3,
                user_id: 1,
                restaurant_id: 2,
                rating: 5,
                comment: "Ottima pizza".to_string(),
                created_at: Utc::now().into(),
            }]])
            .append_query_results([[create_test_user(1, "alice")]])
            .append_query_results([[restaurant::Model {
                id: 2,
                name: "Da Mario".to_string(),
                category_id: 1,
            }]])
            .into_connection();

        let service = create_service(db);
        let reviews = service.list_recent(RECENT_REVIEWS_LIMIT).await.unwrap();

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].username, "alice");
        assert_eq!(reviews[0].restaurant_name, "Da Mario");
    }

    #[tokio::test]
    async fn test_create_with_unknown_restaurant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(1, "alice")]])
            .append_query_results([Vec::<restaurant::Model>::new()])
            .into_connection();

        let service = create_service(db);
        let result = service
            .create(CreateReviewInput {
                user_id: 1,
                restaurant_id: 42,
                rating: 4,
                comment: "ok".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
