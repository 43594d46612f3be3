//! Review repository.

use std::sync::Arc;

use crate::entities::{Review, review};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use where2go_common::{AppError, AppResult};

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<review::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))
    }

    /// Most recent reviews first.
    pub async fn find_recent(&self, limit: u64) -> AppResult<Vec<review::Model>> {
        Review::find()
            .order_by_desc(review::Column::CreatedAt)
            .order_by_desc(review::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a review.
    pub async fn create(
        &self,
        user_id: i32,
        restaurant_id: i32,
        rating: i32,
        comment: &str,
    ) -> AppResult<review::Model> {
        let model = review::ActiveModel {
            user_id: Set(user_id),
            restaurant_id: Set(restaurant_id),
            rating: Set(rating),
            comment: Set(comment.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a review by ID.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Review::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count reviews of a restaurant.
    pub async fn count_by_restaurant(&self, restaurant_id: i32) -> AppResult<u64> {
        Review::find()
            .filter(review::Column::RestaurantId.eq(restaurant_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reviews written by a user.
    pub async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        Review::find()
            .filter(review::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all reviews.
    pub async fn count(&self) -> AppResult<u64> {
        Review::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_review(id: i32, restaurant_id: i32, rating: i32) -> review::Model {
        review::Model {
            id,
            user_id: 1,
            restaurant_id,
            rating,
            comment: "Ottimo".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_recent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_review(2, 1, 4), create_test_review(1, 1, 5)]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.find_recent(10).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 2);
    }

    #[tokio::test]
    async fn test_create_review() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_review(9, 3, 5)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 9,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.create(1, 3, 5, "Ottimo").await.unwrap();

        assert_eq!(result.restaurant_id, 3);
        assert_eq!(result.rating, 5);
    }

    #[tokio::test]
    async fn test_count_by_restaurant() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        assert_eq!(repo.count_by_restaurant(3).await.unwrap(), 2);
    }
}
