//! Category and restaurant catalog service.

use serde::Serialize;
use tracing::info;
use where2go_common::{AppError, AppResult};
use where2go_db::{
    entities::{category, restaurant},
    repositories::{CategoryRepository, RestaurantRepository, ReviewRepository},
};

/// A restaurant together with the name of its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestaurantListing {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub category_name: String,
}

/// Catalog service for business logic.
#[derive(Clone)]
pub struct CatalogService {
    category_repo: CategoryRepository,
    restaurant_repo: RestaurantRepository,
    review_repo: ReviewRepository,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(
        category_repo: CategoryRepository,
        restaurant_repo: RestaurantRepository,
        review_repo: ReviewRepository,
    ) -> Self {
        Self {
            category_repo,
            restaurant_repo,
            review_repo,
        }
    }

    /// All categories in insertion order.
    pub async fn list_categories(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_all().await
    }

    /// All categories sorted by name.
    pub async fn list_categories_by_name(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_all_by_name().await
    }

    /// All restaurants sorted by name, with their category name.
    pub async fn list_restaurants(&self) -> AppResult<Vec<RestaurantListing>> {
        let rows = self.restaurant_repo.find_all_with_category().await?;

        Ok(rows
            .into_iter()
            .map(|(r, c)| RestaurantListing {
                id: r.id,
                name: r.name,
                category_id: r.category_id,
                category_name: c.map(|c| c.name).unwrap_or_default(),
            })
            .collect())
    }

    /// Create a category.
    pub async fn create_category(&self, name: &str) -> AppResult<category::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }

        let category = self.category_repo.create(name).await?;
        info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Delete a category that no restaurant refers to.
    ///
    /// Returns the deleted row. Refused with `IntegrityBlocked` while any
    /// restaurant still belongs to it.
    pub async fn delete_category(&self, id: i32) -> AppResult<category::Model> {
        let category = self.category_repo.get_by_id(id).await?;

        let restaurant_count = self.restaurant_repo.count_by_category(id).await?;
        if restaurant_count > 0 {
            return Err(AppError::IntegrityBlocked(format!(
                "Cannot delete category \"{}\" because it has {restaurant_count} associated restaurants.",
                category.name
            )));
        }

        self.category_repo.delete(id).await?;
        info!(category_id = id, name = %category.name, "Category deleted");
        Ok(category)
    }

    /// Create a restaurant in an existing category.
    pub async fn create_restaurant(
        &self,
        name: &str,
        category_id: Option<i32>,
    ) -> AppResult<restaurant::Model> {
        let name = name.trim();
        let Some(category_id) = category_id.filter(|_| !name.is_empty()) else {
            return Err(AppError::Validation(
                "Restaurant name and category are required".to_string(),
            ));
        };

        self.category_repo.get_by_id(category_id).await?;

        let restaurant = self.restaurant_repo.create(name, category_id).await?;
        info!(
            restaurant_id = restaurant.id,
            category_id = category_id,
            name = %restaurant.name,
            "Restaurant created"
        );
        Ok(restaurant)
    }

    /// Delete a restaurant that has no reviews.
    pub async fn delete_restaurant(&self, id: i32) -> AppResult<restaurant::Model> {
        let restaurant = self.restaurant_repo.get_by_id(id).await?;

        let review_count = self.review_repo.count_by_restaurant(id).await?;
        if review_count > 0 {
            return Err(AppError::IntegrityBlocked(format!(
                "Cannot delete restaurant \"{}\" because it has {review_count} reviews. Delete reviews first.",
                restaurant.name
            )));
        }

        self.restaurant_repo.delete(id).await?;
        info!(restaurant_id = id, name = %restaurant.name, "Restaurant deleted");
        Ok(restaurant)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_service(db: DatabaseConnection) -> CatalogService {
        let db = Arc::new(db);
        CatalogService::new(
            CategoryRepository::new(db.clone()),
            RestaurantRepository::new(db.clone()),
            ReviewRepository::new(db),
        )
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    fn pizza() -> category::Model {
        category::Model {
            id: 1,
            name: "Pizza".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delete_category_with_restaurants_is_blocked() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pizza()]])
            .append_query_results([[count_row(2)]])
            .into_connection();

        let service = create_service(db);
        let result = service.delete_category(1).await;

        match result {
            Err(AppError::IntegrityBlocked(msg)) => {
                assert_eq!(
                    msg,
                    "Cannot delete category \"Pizza\" because it has 2 associated restaurants."
                );
            }
            other => panic!("Expected IntegrityBlocked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_empty_category_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pizza()]])
            .append_query_results([[count_row(0)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let service = create_service(db);
        let deleted = service.delete_category(1).await.unwrap();

        assert_eq!(deleted.name, "Pizza");
    }

    #[tokio::test]
    async fn test_delete_restaurant_with_reviews_is_blocked() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[restaurant::Model {
                id: 4,
                name: "Da Mario".to_string(),
                category_id: 1,
            }]])
            .append_query_results([[count_row(3)]])
            .into_connection();

        let service = create_service(db);
        let result = service.delete_restaurant(4).await;

        match result {
            Err(AppError::IntegrityBlocked(msg)) => {
                assert!(msg.contains("3 reviews"));
                assert!(msg.ends_with("Delete reviews first."));
            }
            other => panic!("Expected IntegrityBlocked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_category_requires_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = create_service(db);

        let result = service.create_category("   ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_restaurant_requires_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = create_service(db);

        let result = service.create_restaurant("Da Mario", None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_restaurant_unknown_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let service = create_service(db);

        let result = service.create_restaurant("Da Mario", Some(9)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
