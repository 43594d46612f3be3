//! Restaurant repository.

use std::sync::Arc;

use crate::entities::{Category, Restaurant, category, restaurant};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use where2go_common::{AppError, AppResult};

/// Restaurant repository for database operations.
#[derive(Clone)]
pub struct RestaurantRepository {
    db: Arc<DatabaseConnection>,
}

impl RestaurantRepository {
    /// Create a new restaurant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a restaurant by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<restaurant::Model>> {
        Restaurant::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a restaurant by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<restaurant::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))
    }

    /// Find restaurants by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<restaurant::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Restaurant::find()
            .filter(restaurant::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All restaurants sorted by name, each paired with its category.
    pub async fn find_all_with_category(
        &self,
    ) -> AppResult<Vec<(restaurant::Model, Option<category::Model>)>> {
        Restaurant::find()
            .find_also_related(Category)
            .order_by_asc(restaurant::Column::Name)
            .order_by_asc(restaurant::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a restaurant in a category.
    pub async fn create(&self, name: &str, category_id: i32) -> AppResult<restaurant::Model> {
        let model = restaurant::ActiveModel {
            name: Set(name.to_string()),
            category_id: Set(category_id),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a restaurant by ID.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Restaurant::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count restaurants that belong to a category.
    pub async fn count_by_category(&self, category_id: i32) -> AppResult<u64> {
        Restaurant::find()
            .filter(restaurant::Column::CategoryId.eq(category_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all restaurants.
    pub async fn count(&self) -> AppResult<u64> {
        Restaurant::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_restaurant(id: i32, name: &str, category_id: i32) -> restaurant::Model {
        restaurant::Model {
            id,
            name: name.to_string(),
            category_id,
        }
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        // No query results appended: any query would fail
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = RestaurantRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_create_restaurant() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_restaurant(3, "Da Mario", 1)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 3,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = RestaurantRepository::new(db);
        let result = repo.create("Da Mario", 1).await.unwrap();

        assert_eq!(result.id, 3);
        assert_eq!(result.category_id, 1);
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_restaurant(3, "Da Mario", 1)]])
                .into_connection(),
        );

        let repo = RestaurantRepository::new(db);
        let result = repo.get_by_id(3).await.unwrap();

        assert_eq!(result.name, "Da Mario");
    }
}
