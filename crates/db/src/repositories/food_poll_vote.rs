//! Food poll vote repository.

use std::sync::Arc;

use crate::entities::{FoodPollVote, food_poll_vote};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use where2go_common::{AppError, AppResult};

/// Food poll vote repository for database operations.
#[derive(Clone)]
pub struct FoodPollVoteRepository {
    db: Arc<DatabaseConnection>,
}

impl FoodPollVoteRepository {
    /// Create a new food poll vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All votes held by a user.
    pub async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<food_poll_vote::Model>> {
        FoodPollVote::find()
            .filter(food_poll_vote::Column::UserId.eq(user_id))
            .order_by_asc(food_poll_vote::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every vote row, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<food_poll_vote::Model>> {
        FoodPollVote::find()
            .order_by_asc(food_poll_vote::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a vote.
    pub async fn create(&self, user_id: i32, category_id: i32) -> AppResult<food_poll_vote::Model> {
        let model = food_poll_vote::ActiveModel {
            user_id: Set(user_id),
            category_id: Set(category_id),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove every vote the user holds for a category.
    ///
    /// Returns how many rows were deleted, so stray duplicates go too.
    pub async fn delete_by_user_and_category(
        &self,
        user_id: i32,
        category_id: i32,
    ) -> AppResult<u64> {
        let result = FoodPollVote::delete_many()
            .filter(food_poll_vote::Column::UserId.eq(user_id))
            .filter(food_poll_vote::Column::CategoryId.eq(category_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Remove every vote, returning how many rows were deleted.
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = FoodPollVote::delete_many()
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Count all votes.
    pub async fn count(&self) -> AppResult<u64> {
        FoodPollVote::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count votes held by a user.
    pub async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        FoodPollVote::find()
            .filter(food_poll_vote::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
