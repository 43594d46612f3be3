//! Presence vote repository.

use std::sync::Arc;

use crate::entities::{Presence, PresenceVote, presence_vote};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use where2go_common::{AppError, AppResult};

/// Presence vote repository for database operations.
#[derive(Clone)]
pub struct PresenceVoteRepository {
    db: Arc<DatabaseConnection>,
}

impl PresenceVoteRepository {
    /// Create a new presence vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's presence row.
    pub async fn find_by_user(&self, user_id: i32) -> AppResult<Option<presence_vote::Model>> {
        PresenceVote::find()
            .filter(presence_vote::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every presence row, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<presence_vote::Model>> {
        PresenceVote::find()
            .order_by_asc(presence_vote::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace the user's single presence row.
    ///
    /// The unique index on `user_id` keeps one row per user even if two
    /// requests race; the loser fails with a database error.
    pub async fn upsert(&self, user_id: i32, presence: Presence) -> AppResult<presence_vote::Model> {
        match self.find_by_user(user_id).await? {
            Some(existing) if existing.presence == presence => Ok(existing),
            Some(existing) => {
                let mut active: presence_vote::ActiveModel = existing.into();
                active.presence = Set(presence);
                active
                    .update(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            None => {
                let model = presence_vote::ActiveModel {
                    user_id: Set(user_id),
                    presence: Set(presence),
                    ..Default::default()
                };
                model
                    .insert(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
        }
    }

    /// Delete the user's presence row, returning how many rows were removed.
    pub async fn delete_by_user(&self, user_id: i32) -> AppResult<u64> {
        let result = PresenceVote::delete_many()
            .filter(presence_vote::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Count presence rows belonging to a user (0 or 1).
    pub async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        PresenceVote::find()
            .filter(presence_vote::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
