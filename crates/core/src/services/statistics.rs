//! Row counts for the admin overview.

use serde::Serialize;
use where2go_common::AppResult;
use where2go_db::repositories::{
    CategoryRepository, FoodPollVoteRepository, RestaurantRepository, ReviewRepository,
    UserRepository,
};

/// Totals across the data store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub categories: u64,
    pub restaurants: u64,
    pub users: u64,
    pub reviews: u64,
    /// Food poll vote rows.
    pub polls: u64,
}

#[derive(Clone)]
pub struct StatisticsService {
    category_repo: CategoryRepository,
    restaurant_repo: RestaurantRepository,
    user_repo: UserRepository,
    review_repo: ReviewRepository,
    food_vote_repo: FoodPollVoteRepository,
}

impl StatisticsService {
    #[must_use]
    pub const fn new(
        category_repo: CategoryRepository,
        restaurant_repo: RestaurantRepository,
        user_repo: UserRepository,
        review_repo: ReviewRepository,
        food_vote_repo: FoodPollVoteRepository,
    ) -> Self {
        Self {
            category_repo,
            restaurant_repo,
            user_repo,
            review_repo,
            food_vote_repo,
        }
    }

    /// Count every table the admin cares about.
    pub async fn collect(&self) -> AppResult<Statistics> {
        Ok(Statistics {
            categories: self.category_repo.count().await?,
            restaurants: self.restaurant_repo.count().await?,
            users: self.user_repo.count().await?,
            reviews: self.review_repo.count().await?,
            polls: self.food_vote_repo.count().await?,
        })
    }
}
