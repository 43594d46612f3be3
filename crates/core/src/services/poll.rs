//! Food and presence poll service.

use std::collections::HashMap;

use tracing::info;
use where2go_common::AppResult;
use where2go_db::{
    entities::Presence,
    repositories::{
        CategoryRepository, FoodPollVoteRepository, PresenceVoteRepository, UserRepository,
    },
};

use super::tally::{
    FoodPollData, PresenceData, VoteIndex, tally_food_votes, tally_presence,
};

/// What a food vote toggle does to the caller's row for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodVoteTransition {
    /// No vote yet: record one.
    Cast,
    /// A vote exists: remove it.
    Retract,
}

impl FoodVoteTransition {
    /// Transition that flips the current state.
    #[must_use]
    pub const fn toggle(already_voted: bool) -> Self {
        if already_voted { Self::Retract } else { Self::Cast }
    }
}

/// What a presence vote does to the caller's single presence row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceTransition {
    /// Create or replace the row with this value.
    Set(Presence),
    /// Remove the row.
    Clear,
}

impl From<Option<Presence>> for PresenceTransition {
    fn from(value: Option<Presence>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }
}

/// Food poll state as seen by one user.
#[derive(Debug, Clone)]
pub struct FoodPollSnapshot {
    pub poll_data: FoodPollData,
    pub user_votes: Vec<i32>,
}

/// Presence poll state as seen by one user.
#[derive(Debug, Clone)]
pub struct PresencePollSnapshot {
    pub presence_data: PresenceData,
    pub user_vote: Option<Presence>,
}

/// Poll service for business logic.
#[derive(Clone)]
pub struct PollService {
    category_repo: CategoryRepository,
    food_vote_repo: FoodPollVoteRepository,
    presence_repo: PresenceVoteRepository,
    user_repo: UserRepository,
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    pub const fn new(
        category_repo: CategoryRepository,
        food_vote_repo: FoodPollVoteRepository,
        presence_repo: PresenceVoteRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            category_repo,
            food_vote_repo,
            presence_repo,
            user_repo,
        }
    }

    /// Flip the user's vote for a category and return the fresh tallies.
    ///
    /// Fails with `NotFound` before touching any row if the category does not
    /// exist.
    pub async fn toggle_food_vote(
        &self,
        user_id: i32,
        category_id: i32,
    ) -> AppResult<FoodPollSnapshot> {
        self.category_repo.get_by_id(category_id).await?;

        let own_votes = self.food_vote_repo.find_by_user(user_id).await?;
        let already_voted = VoteIndex::from_votes(&own_votes).has_vote(user_id, category_id);

        match FoodVoteTransition::toggle(already_voted) {
            FoodVoteTransition::Cast => {
                self.food_vote_repo.create(user_id, category_id).await?;
                info!(user_id = user_id, category_id = category_id, "Food vote cast");
            }
            FoodVoteTransition::Retract => {
                let removed = self
                    .food_vote_repo
                    .delete_by_user_and_category(user_id, category_id)
                    .await?;
                info!(
                    user_id = user_id,
                    category_id = category_id,
                    removed = removed,
                    "Food vote retracted"
                );
            }
        }

        self.food_poll_snapshot(user_id).await
    }

    /// Current food poll tallies plus the categories the user voted for.
    pub async fn food_poll_snapshot(&self, user_id: i32) -> AppResult<FoodPollSnapshot> {
        let categories = self.category_repo.find_all().await?;
        let votes = self.food_vote_repo.find_all().await?;

        let user_ids: Vec<i32> = votes.iter().map(|v| v.user_id).collect();
        let usernames = self.usernames(&user_ids).await?;

        Ok(FoodPollSnapshot {
            poll_data: tally_food_votes(&categories, &votes, &usernames),
            user_votes: VoteIndex::from_votes(&votes).categories_of(user_id),
        })
    }

    /// Set, change or clear the user's presence and return the fresh tallies.
    pub async fn set_presence(
        &self,
        user_id: i32,
        value: Option<Presence>,
    ) -> AppResult<PresencePollSnapshot> {
        match PresenceTransition::from(value) {
            PresenceTransition::Set(presence) => {
                self.presence_repo.upsert(user_id, presence).await?;
                info!(user_id = user_id, presence = presence.as_str(), "Presence set");
            }
            PresenceTransition::Clear => {
                let removed = self.presence_repo.delete_by_user(user_id).await?;
                info!(user_id = user_id, removed = removed, "Presence cleared");
            }
        }

        self.presence_snapshot(user_id).await
    }

    /// Current presence tallies plus the user's own value.
    pub async fn presence_snapshot(&self, user_id: i32) -> AppResult<PresencePollSnapshot> {
        let rows = self.presence_repo.find_all().await?;

        let user_ids: Vec<i32> = rows.iter().map(|r| r.user_id).collect();
        let usernames = self.usernames(&user_ids).await?;

        let user_vote = rows
            .iter()
            .find(|r| r.user_id == user_id)
            .map(|r| r.presence);

        Ok(PresencePollSnapshot {
            presence_data: tally_presence(&rows, &usernames),
            user_vote,
        })
    }

    /// Delete every food vote (poll reset). Returns the number removed.
    pub async fn clear_food_votes(&self) -> AppResult<u64> {
        let removed = self.food_vote_repo.delete_all().await?;
        info!(removed = removed, "Food poll cleared");
        Ok(removed)
    }

    async fn usernames(&self, user_ids: &[i32]) -> AppResult<HashMap<i32, String>> {
        let mut ids = user_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let users = self.user_repo.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
    }
}
