//! Category repository.

use std::sync::Arc;

use crate::entities::{Category, category};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use where2go_common::{AppError, AppResult};

/// Category repository for database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a category by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<category::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// All categories in insertion order.
    pub async fn find_all(&self) -> AppResult<Vec<category::Model>> {
        Category::find()
            .order_by_asc(category::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All categories sorted by name (admin listing).
    pub async fn find_all_by_name(&self) -> AppResult<Vec<category::Model>> {
        Category::find()
            .order_by_asc(category::Column::Name)
            .order_by_asc(category::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a category.
    pub async fn create(&self, name: &str) -> AppResult<category::Model> {
        let model = category::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a category by ID.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Category::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all categories.
    pub async fn count(&self) -> AppResult<u64> {
        Category::find()
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

    fn create_test_category(id: i32, name: &str) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let result = repo.get_by_id(42).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_all_by_name() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_category(2, "Giapponese"),
                    create_test_category(1, "Pizza"),
                ]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let result = repo.find_all_by_name().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Giapponese");
    }

    #[tokio::test]
    async fn test_create_category() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_category(1, "Pizza")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let result = repo.create("Pizza").await.unwrap();

        assert_eq!(result.id, 1);
        assert_eq!(result.name, "Pizza");
    }
}
