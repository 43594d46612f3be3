//! Vote aggregation.
//!
//! Pure functions over vote rows. Nothing here reads the database, so a tally
//! is exactly as fresh as the rows the caller just loaded.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;
use where2go_db::entities::{Presence, category, food_poll_vote, presence_vote};

/// Current voters of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub count: usize,
    pub voters: Vec<String>,
    pub category_name: String,
}

/// Food poll results keyed by category id.
///
/// Serialized through `serde_json` the integer keys become strings, which is
/// the wire shape of `poll_data`.
pub type FoodPollData = BTreeMap<i32, CategoryTally>;

/// Voters in one presence state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresenceTally {
    pub count: usize,
    pub voters: Vec<String>,
}

/// Presence poll results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresenceData {
    pub present: PresenceTally,
    pub absent: PresenceTally,
}

impl PresenceData {
    fn bucket_mut(&mut self, presence: Presence) -> &mut PresenceTally {
        match presence {
            Presence::Present => &mut self.present,
            Presence::Absent => &mut self.absent,
        }
    }
}

/// Per-user view of the food vote table: user id to the set of category ids
/// that user currently holds a vote for.
#[derive(Debug, Clone, Default)]
pub struct VoteIndex {
    by_user: HashMap<i32, BTreeSet<i32>>,
}

impl VoteIndex {
    /// Index a set of vote rows.
    #[must_use]
    pub fn from_votes(votes: &[food_poll_vote::Model]) -> Self {
        let mut by_user: HashMap<i32, BTreeSet<i32>> = HashMap::new();
        for vote in votes {
            by_user
                .entry(vote.user_id)
                .or_default()
                .insert(vote.category_id);
        }
        Self { by_user }
    }

    /// Whether the user holds a vote for the category.
    #[must_use]
    pub fn has_vote(&self, user_id: i32, category_id: i32) -> bool {
        self.by_user
            .get(&user_id)
            .is_some_and(|categories| categories.contains(&category_id))
    }

    /// Category ids the user voted for, ascending.
    #[must_use]
    pub fn categories_of(&self, user_id: i32) -> Vec<i32> {
        self.by_user
            .get(&user_id)
            .map(|categories| categories.iter().copied().collect())
            .unwrap_or_default()
    }
}

fn display_name(usernames: &HashMap<i32, String>, user_id: i32) -> String {
    usernames
        .get(&user_id)
        .cloned()
        .unwrap_or_else(|| format!("user #{user_id}"))
}

/// Tally food votes for every category.
///
/// Every category appears in the result, with a zero count when nobody voted
/// for it. Counts are distinct users; a duplicated (user, category) row is
/// counted once. Voters are listed in the order of `votes`. Votes pointing at
/// a category not in `categories` are ignored.
#[must_use]
pub fn tally_food_votes(
    categories: &[category::Model],
    votes: &[food_poll_vote::Model],
    usernames: &HashMap<i32, String>,
) -> FoodPollData {
    let mut data: FoodPollData = categories
        .iter()
        .map(|c| {
            (
                c.id,
                CategoryTally {
                    count: 0,
                    voters: Vec::new(),
                    category_name: c.name.clone(),
                },
            )
        })
        .collect();

    let mut seen = HashSet::new();
    for vote in votes {
        let Some(tally) = data.get_mut(&vote.category_id) else {
            continue;
        };
        if !seen.insert((vote.user_id, vote.category_id)) {
            continue;
        }
        tally.voters.push(display_name(usernames, vote.user_id));
        tally.count += 1;
    }

    data
}

/// Tally presence rows into the two presence states.
#[must_use]
pub fn tally_presence(
    rows: &[presence_vote::Model],
    usernames: &HashMap<i32, String>,
) -> PresenceData {
    let mut data = PresenceData::default();
    let mut seen = HashSet::new();
    for row in rows {
        if !seen.insert(row.user_id) {
            continue;
        }
        let bucket = data.bucket_mut(row.presence);
        bucket.voters.push(display_name(usernames, row.user_id));
        bucket.count += 1;
    }
    data
}
